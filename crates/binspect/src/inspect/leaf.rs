// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builtin leaf types.
//!
//! Leaves map one-to-one onto a `value_*` call of the format. `usize` and
//! `isize` are squashed to 64 bits, `char` travels as its scalar value.

use std::fmt;

use super::category::{Categorized, Category};
use super::load::Load;
use super::save::Save;
use super::traits::{Deserializer, Serializer};
use crate::error::{Error, Result};

/// Extended-precision float without a portable binary layout.
///
/// Encoded as the shortest decimal text that parses back to the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct LongDouble(pub f64);

impl From<f64> for LongDouble {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LongDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// String of 16-bit code units.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U16String(pub Vec<u16>);

impl U16String {
    pub fn as_units(&self) -> &[u16] {
        &self.0
    }

    /// Decode as UTF-16; unpaired surrogates fail with `InvalidArgument`.
    pub fn to_string_checked(&self) -> Result<String> {
        String::from_utf16(&self.0).map_err(|_| Error::invalid_argument("invalid UTF-16"))
    }
}

impl From<&str> for U16String {
    fn from(value: &str) -> Self {
        Self(value.encode_utf16().collect())
    }
}

/// String of 32-bit code units.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U32String(pub Vec<u32>);

impl U32String {
    pub fn as_units(&self) -> &[u32] {
        &self.0
    }

    pub fn to_string_checked(&self) -> Result<String> {
        self.0
            .iter()
            .map(|&unit| char::from_u32(unit))
            .collect::<Option<String>>()
            .ok_or_else(|| Error::invalid_argument("invalid UTF-32 scalar"))
    }
}

impl From<&str> for U32String {
    fn from(value: &str) -> Self {
        Self(value.chars().map(u32::from).collect())
    }
}

macro_rules! impl_builtin_leaf {
    ($($ty:ty => $save:ident, $load:ident;)*) => {
        $(
            impl Categorized for $ty {
                const CATEGORY: Category = Category::Builtin;
            }

            impl Save for $ty {
                fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
                    f.$save(*self)
                }
            }

            impl Load for $ty {
                fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
                    *self = f.$load()?;
                    Ok(())
                }
            }
        )*
    };
}

impl_builtin_leaf! {
    i8 => value_i8, value_i8;
    i16 => value_i16, value_i16;
    i32 => value_i32, value_i32;
    i64 => value_i64, value_i64;
    u16 => value_u16, value_u16;
    u32 => value_u32, value_u32;
    u64 => value_u64, value_u64;
    f32 => value_f32, value_f32;
    f64 => value_f64, value_f64;
}

// bool and u8 override the slice hooks: bit-packed booleans, raw byte blocks.

impl Categorized for bool {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for bool {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_bool(*self)
    }

    fn save_slice<S: Serializer + ?Sized>(items: &[Self], f: &mut S) -> Result<()> {
        f.value_bool_seq(items)
    }
}

impl Load for bool {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        *self = f.value_bool()?;
        Ok(())
    }

    fn load_vec<D: Deserializer + ?Sized>(out: &mut Vec<Self>, f: &mut D) -> Result<()> {
        f.value_bool_seq(out)
    }
}

impl Categorized for u8 {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for u8 {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_u8(*self)
    }

    fn save_slice<S: Serializer + ?Sized>(items: &[Self], f: &mut S) -> Result<()> {
        f.begin_sequence(items.len())?;
        f.value_bytes(items)?;
        f.end_sequence()
    }
}

impl Load for u8 {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        *self = f.value_u8()?;
        Ok(())
    }

    fn load_vec<D: Deserializer + ?Sized>(out: &mut Vec<Self>, f: &mut D) -> Result<()> {
        let len = f.begin_sequence()?;
        *out = f.value_bytes(len)?;
        f.end_sequence()
    }
}

impl Categorized for usize {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for usize {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_u64(*self as u64)
    }
}

impl Load for usize {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        let value = f.value_u64()?;
        *self = usize::try_from(value)
            .map_err(|_| Error::invalid_argument(format!("{value} does not fit usize")))?;
        Ok(())
    }
}

impl Categorized for isize {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for isize {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_i64(*self as i64)
    }
}

impl Load for isize {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        let value = f.value_i64()?;
        *self = isize::try_from(value)
            .map_err(|_| Error::invalid_argument(format!("{value} does not fit isize")))?;
        Ok(())
    }
}

impl Categorized for char {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for char {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_u32(u32::from(*self))
    }
}

impl Load for char {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        let value = f.value_u32()?;
        *self = char::from_u32(value)
            .ok_or_else(|| Error::invalid_argument(format!("{value:#x} is not a scalar value")))?;
        Ok(())
    }
}

impl Categorized for str {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for str {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_str(self)
    }
}

impl Categorized for String {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for String {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_str(self)
    }
}

impl Load for String {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        *self = f.value_string()?;
        Ok(())
    }
}

impl Categorized for LongDouble {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for LongDouble {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_long_double(self.0)
    }
}

impl Load for LongDouble {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.0 = f.value_long_double()?;
        Ok(())
    }
}

impl Categorized for U16String {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for U16String {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_u16_string(&self.0)
    }
}

impl Load for U16String {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.0 = f.value_u16_string()?;
        Ok(())
    }
}

impl Categorized for U32String {
    const CATEGORY: Category = Category::Builtin;
}

impl Save for U32String {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.value_u32_string(&self.0)
    }
}

impl Load for U32String {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.0 = f.value_u32_string()?;
        Ok(())
    }
}
