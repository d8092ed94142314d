// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Format protocol.
//!
//! [`Serializer`] and [`Deserializer`] are the mirrored contracts a wire
//! format implements. The dispatch engine only talks to these traits, so the
//! object/list/map/tuple/variant routing is written once and runs against any
//! format. Scope methods (`begin_object`, `begin_tuple`, ...) may be no-ops for
//! formats without delimiters.

use crate::error::{Error, ErrorCode, Result};
use crate::type_id::TypeId;

/// Encode side of a format.
pub trait Serializer {
    /// Whether durations and timestamps should be rendered as text.
    fn has_human_readable_format(&self) -> bool {
        false
    }

    fn begin_object(&mut self, type_id: TypeId, name: &str) -> Result<()>;
    fn end_object(&mut self) -> Result<()>;

    fn begin_field(&mut self, name: &str) -> Result<()>;
    fn begin_optional_field(&mut self, name: &str, is_present: bool) -> Result<()>;
    /// Open a field holding alternative `index` of `types`.
    fn begin_variant_field(&mut self, name: &str, types: &[TypeId], index: usize) -> Result<()>;
    fn begin_optional_variant_field(
        &mut self,
        name: &str,
        is_present: bool,
        types: &[TypeId],
        index: usize,
    ) -> Result<()>;
    fn end_field(&mut self) -> Result<()>;

    fn begin_tuple(&mut self, size: usize) -> Result<()>;
    fn end_tuple(&mut self) -> Result<()>;

    fn begin_key_value_pair(&mut self) -> Result<()>;
    fn end_key_value_pair(&mut self) -> Result<()>;

    fn begin_sequence(&mut self, size: usize) -> Result<()>;
    fn end_sequence(&mut self) -> Result<()>;

    fn begin_associative_array(&mut self, size: usize) -> Result<()>;
    fn end_associative_array(&mut self) -> Result<()>;

    fn value_bool(&mut self, value: bool) -> Result<()>;
    fn value_i8(&mut self, value: i8) -> Result<()>;
    fn value_i16(&mut self, value: i16) -> Result<()>;
    fn value_i32(&mut self, value: i32) -> Result<()>;
    fn value_i64(&mut self, value: i64) -> Result<()>;
    fn value_u8(&mut self, value: u8) -> Result<()>;
    fn value_u16(&mut self, value: u16) -> Result<()>;
    fn value_u32(&mut self, value: u32) -> Result<()>;
    fn value_u64(&mut self, value: u64) -> Result<()>;
    fn value_f32(&mut self, value: f32) -> Result<()>;
    fn value_f64(&mut self, value: f64) -> Result<()>;
    fn value_long_double(&mut self, value: f64) -> Result<()>;
    fn value_str(&mut self, value: &str) -> Result<()>;
    fn value_u16_string(&mut self, value: &[u16]) -> Result<()>;
    fn value_u32_string(&mut self, value: &[u32]) -> Result<()>;
    /// Raw byte block; the length is not written.
    fn value_bytes(&mut self, value: &[u8]) -> Result<()>;
    /// Length-prefixed boolean sequence.
    fn value_bool_seq(&mut self, value: &[bool]) -> Result<()>;
}

/// Decode side of a format.
pub trait Deserializer {
    fn has_human_readable_format(&self) -> bool {
        false
    }

    /// Type id of the next object, for self-describing formats only.
    fn fetch_next_object_type(&mut self) -> Result<TypeId> {
        Err(Error::with_context(
            ErrorCode::UnsupportedOperation,
            "format is not self-describing",
        ))
    }

    /// Unread input bytes, used to bound pre-allocation.
    fn remaining(&self) -> usize;

    fn begin_object(&mut self, type_id: TypeId, name: &str) -> Result<()>;
    fn end_object(&mut self) -> Result<()>;

    fn begin_field(&mut self, name: &str) -> Result<()>;
    /// Returns the presence flag.
    fn begin_optional_field(&mut self, name: &str) -> Result<bool>;
    /// Returns the validated index into `types`.
    fn begin_variant_field(&mut self, name: &str, types: &[TypeId]) -> Result<usize>;
    /// Returns `None` for an absent field, otherwise the validated index.
    fn begin_optional_variant_field(
        &mut self,
        name: &str,
        types: &[TypeId],
    ) -> Result<Option<usize>>;
    fn end_field(&mut self) -> Result<()>;

    fn begin_tuple(&mut self, size: usize) -> Result<()>;
    fn end_tuple(&mut self) -> Result<()>;

    fn begin_key_value_pair(&mut self) -> Result<()>;
    fn end_key_value_pair(&mut self) -> Result<()>;

    /// Returns the element count.
    fn begin_sequence(&mut self) -> Result<usize>;
    fn end_sequence(&mut self) -> Result<()>;

    /// Returns the pair count.
    fn begin_associative_array(&mut self) -> Result<usize>;
    fn end_associative_array(&mut self) -> Result<()>;

    fn value_bool(&mut self) -> Result<bool>;
    fn value_i8(&mut self) -> Result<i8>;
    fn value_i16(&mut self) -> Result<i16>;
    fn value_i32(&mut self) -> Result<i32>;
    fn value_i64(&mut self) -> Result<i64>;
    fn value_u8(&mut self) -> Result<u8>;
    fn value_u16(&mut self) -> Result<u16>;
    fn value_u32(&mut self) -> Result<u32>;
    fn value_u64(&mut self) -> Result<u64>;
    fn value_f32(&mut self) -> Result<f32>;
    fn value_f64(&mut self) -> Result<f64>;
    fn value_long_double(&mut self) -> Result<f64>;
    fn value_string(&mut self) -> Result<String>;
    fn value_u16_string(&mut self) -> Result<Vec<u16>>;
    fn value_u32_string(&mut self) -> Result<Vec<u32>>;
    /// Raw block of `len` bytes; bounds are checked before allocating.
    fn value_bytes(&mut self, len: usize) -> Result<Vec<u8>>;
    /// Length-prefixed boolean sequence, replacing the contents of `out`.
    fn value_bool_seq(&mut self, out: &mut Vec<bool>) -> Result<()>;
}
