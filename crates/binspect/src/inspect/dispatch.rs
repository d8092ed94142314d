// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Category routing shared by every format.
//!
//! All recursion goes through [`save_value`] / [`load_value`], which reject
//! `Unsupported` types before touching the wire and otherwise hand over to the
//! type's own strategy. The list and map drivers below are the only places
//! where element counts are produced or consumed.

use std::any::type_name;

use super::category::{Categorized, Category};
use super::load::Load;
use super::save::Save;
use super::traits::{Deserializer, Serializer};
use crate::error::{Error, Result};

/// `UnsafeType` for types (or containers of types) with no wire form.
pub fn ensure_supported<T: Categorized + ?Sized>() -> Result<()> {
    if T::CATEGORY == Category::Unsupported {
        return Err(Error::unsafe_type(type_name::<T>()));
    }
    Ok(())
}

/// Encode one value of any category.
pub fn save_value<T, S>(value: &T, f: &mut S) -> Result<()>
where
    T: Save + ?Sized,
    S: Serializer + ?Sized,
{
    ensure_supported::<T>()?;
    value.save(f)
}

/// Decode one value of any category into `value`.
pub fn load_value<T, D>(value: &mut T, f: &mut D) -> Result<()>
where
    T: Load + ?Sized,
    D: Deserializer + ?Sized,
{
    ensure_supported::<T>()?;
    value.load(f)
}

/// Sequence scope sized to `len`, then every element in iteration order.
pub fn save_list<'a, T, I, S>(len: usize, items: I, f: &mut S) -> Result<()>
where
    T: Save + 'a,
    I: IntoIterator<Item = &'a T>,
    S: Serializer + ?Sized,
{
    f.begin_sequence(len)?;
    for item in items {
        save_value(item, f)?;
    }
    f.end_sequence()
}

/// Decode a sequence, handing each element to `push` in wire order.
pub fn load_list<T, D, P>(f: &mut D, mut push: P) -> Result<()>
where
    T: Load + Default,
    D: Deserializer + ?Sized,
    P: FnMut(T) -> Result<()>,
{
    let len = f.begin_sequence()?;
    for _ in 0..len {
        let mut item = T::default();
        load_value(&mut item, f)?;
        push(item)?;
    }
    f.end_sequence()
}

/// Associative scope sized to `len`, then key and value of every pair.
pub fn save_map<'a, K, V, I, S>(len: usize, pairs: I, f: &mut S) -> Result<()>
where
    K: Save + 'a,
    V: Save + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
    S: Serializer + ?Sized,
{
    f.begin_associative_array(len)?;
    for (key, value) in pairs {
        f.begin_key_value_pair()?;
        save_value(key, f)?;
        save_value(value, f)?;
        f.end_key_value_pair()?;
    }
    f.end_associative_array()
}

/// Decode an associative array, handing each pair to `insert`.
pub fn load_map<K, V, D, P>(f: &mut D, mut insert: P) -> Result<()>
where
    K: Load + Default,
    V: Load + Default,
    D: Deserializer + ?Sized,
    P: FnMut(K, V) -> Result<()>,
{
    let len = f.begin_associative_array()?;
    for _ in 0..len {
        f.begin_key_value_pair()?;
        let mut key = K::default();
        load_value(&mut key, f)?;
        let mut value = V::default();
        load_value(&mut value, f)?;
        f.end_key_value_pair()?;
        insert(key, value)?;
    }
    f.end_associative_array()
}
