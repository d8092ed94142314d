// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode half of the dispatch engine.
//!
//! [`Load`] decodes in place. Hooks mirror [`Save`](super::save::Save):
//! `load_field`, `load_optional_field` and `load_vec`. Containers never trust
//! a declared element count for pre-allocation beyond the remaining input.

use std::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use std::marker::PhantomData;

use super::category::Categorized;
use super::dispatch::{load_list, load_map, load_value};
use super::traits::Deserializer;
use crate::config::INVALID_TYPE_ID;
use crate::error::{Error, ErrorCode, Result};

/// Types that can be read from a [`Deserializer`].
pub trait Load: Categorized {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()>;

    /// Open a required field and decode into `self`.
    /// The caller closes the field.
    fn load_field<D: Deserializer + ?Sized>(&mut self, f: &mut D, name: &str) -> Result<()> {
        f.begin_field(name)?;
        load_value(self, f)
    }

    /// Open an optional field; `slot` becomes `None` when the field is absent.
    /// The caller closes the field.
    fn load_optional_field<D: Deserializer + ?Sized>(
        slot: &mut Option<Self>,
        f: &mut D,
        name: &str,
    ) -> Result<()>
    where
        Self: Sized + Default,
    {
        if f.begin_optional_field(name)? {
            let mut value = Self::default();
            load_value(&mut value, f)?;
            *slot = Some(value);
        } else {
            *slot = None;
        }
        Ok(())
    }

    /// Replace the contents of `out` with a decoded sequence.
    fn load_vec<D: Deserializer + ?Sized>(out: &mut Vec<Self>, f: &mut D) -> Result<()>
    where
        Self: Sized + Default,
    {
        let len = f.begin_sequence()?;
        out.clear();
        out.reserve(len.min(f.remaining()));
        for _ in 0..len {
            let mut item = Self::default();
            load_value(&mut item, f)?;
            out.push(item);
        }
        f.end_sequence()
    }
}

impl<T: Load + Default> Load for Vec<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        T::load_vec(self, f)
    }
}

impl<T: Load + Default> Load for VecDeque<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.clear();
        load_list(f, |item| {
            self.push_back(item);
            Ok(())
        })
    }
}

impl<T: Load + Default> Load for LinkedList<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.clear();
        load_list(f, |item| {
            self.push_back(item);
            Ok(())
        })
    }
}

impl<T: Load + Default + Ord> Load for BTreeSet<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.clear();
        load_list(f, |item| {
            if self.insert(item) {
                Ok(())
            } else {
                log::debug!("[binspect] duplicate set element");
                Err(Error::with_context(ErrorCode::RuntimeError, "duplicate set element"))
            }
        })
    }
}

impl<K, V> Load for BTreeMap<K, V>
where
    K: Load + Default + Ord,
    V: Load + Default,
{
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        self.clear();
        load_map(f, |key, value| {
            if self.insert(key, value).is_none() {
                Ok(())
            } else {
                log::debug!("[binspect] duplicate map key");
                Err(Error::with_context(ErrorCode::RuntimeError, "duplicate key"))
            }
        })
    }
}

impl<T: Load, const N: usize> Load for [T; N] {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        f.begin_tuple(N)?;
        for item in self.iter_mut() {
            load_value(item, f)?;
        }
        f.end_tuple()
    }
}

impl<T: Load + Default> Load for Option<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        f.begin_object(INVALID_TYPE_ID, "optional")?;
        T::load_optional_field(self, f, "value")?;
        f.end_field()?;
        f.end_object()
    }

    fn load_field<D: Deserializer + ?Sized>(&mut self, f: &mut D, name: &str) -> Result<()> {
        T::load_optional_field(self, f, name)
    }
}

impl<T: Load + Default> Load for Box<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        (**self).load(f)
    }

    fn load_field<D: Deserializer + ?Sized>(&mut self, f: &mut D, name: &str) -> Result<()> {
        (**self).load_field(f, name)
    }

    fn load_optional_field<D: Deserializer + ?Sized>(
        slot: &mut Option<Self>,
        f: &mut D,
        name: &str,
    ) -> Result<()> {
        let mut inner = None;
        T::load_optional_field(&mut inner, f, name)?;
        *slot = inner.map(Box::new);
        Ok(())
    }
}

impl<T: ?Sized> Load for PhantomData<T> {
    fn load<D: Deserializer + ?Sized>(&mut self, _f: &mut D) -> Result<()> {
        Ok(())
    }
}

impl<T: ?Sized> Load for *const T {
    fn load<D: Deserializer + ?Sized>(&mut self, _f: &mut D) -> Result<()> {
        Err(Error::unsafe_type(std::any::type_name::<Self>()))
    }
}

impl<T: ?Sized> Load for *mut T {
    fn load<D: Deserializer + ?Sized>(&mut self, _f: &mut D) -> Result<()> {
        Err(Error::unsafe_type(std::any::type_name::<Self>()))
    }
}

macro_rules! impl_load_tuple {
    ($len:expr => $($name:ident $idx:tt),+) => {
        impl<$($name: Load),+> Load for ($($name,)+) {
            fn load<De: Deserializer + ?Sized>(&mut self, f: &mut De) -> Result<()> {
                f.begin_tuple($len)?;
                $(load_value(&mut self.$idx, f)?;)+
                f.end_tuple()
            }
        }
    };
}

impl_load_tuple!(1 => A 0);
impl_load_tuple!(2 => A 0, B 1);
impl_load_tuple!(3 => A 0, B 1, C 2);
impl_load_tuple!(4 => A 0, B 1, C 2, D 3);
impl_load_tuple!(5 => A 0, B 1, C 2, D 3, E 4);
impl_load_tuple!(6 => A 0, B 1, C 2, D 3, E 4, F 5);
impl_load_tuple!(7 => A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_load_tuple!(8 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_load_tuple!(9 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
impl_load_tuple!(10 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
impl_load_tuple!(11 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
impl_load_tuple!(12 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

impl Load for () {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        f.begin_tuple(0)?;
        f.end_tuple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_bytes, to_bytes};

    #[test]
    fn test_containers_roundtrip() {
        let list: VecDeque<i16> = [-3, 0, 9].into_iter().collect();
        let bytes = to_bytes(&list).expect("encode should succeed");
        assert_eq!(
            from_bytes::<VecDeque<i16>>(&bytes).expect("decode should succeed"),
            list
        );

        let linked: LinkedList<String> = ["a", "bc"].iter().map(|s| s.to_string()).collect();
        let bytes = to_bytes(&linked).expect("encode should succeed");
        assert_eq!(
            from_bytes::<LinkedList<String>>(&bytes).expect("decode should succeed"),
            linked
        );

        let mut map = BTreeMap::new();
        map.insert(String::from("k"), vec![1u32, 2]);
        let bytes = to_bytes(&map).expect("encode should succeed");
        assert_eq!(
            from_bytes::<BTreeMap<String, Vec<u32>>>(&bytes).expect("decode should succeed"),
            map
        );
    }

    #[test]
    fn test_duplicate_map_key_rejected() {
        // two pairs, both with key 1
        let bytes = [0x02, 1, 10, 1, 20];
        let err = from_bytes::<BTreeMap<u8, u8>>(&bytes).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RuntimeError);
    }

    #[test]
    fn test_duplicate_set_element_rejected() {
        let bytes = [0x03, 4, 5, 4];
        let err = from_bytes::<BTreeSet<u8>>(&bytes).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RuntimeError);
    }

    #[test]
    fn test_load_replaces_previous_contents() {
        let mut values = vec![9u32, 9, 9];
        let bytes = to_bytes(&vec![1u32]).expect("encode should succeed");
        let mut de = crate::BinaryDeserializer::new(&bytes);
        de.apply(&mut values).expect("decode should succeed");
        assert_eq!(values, [1]);
    }

    #[test]
    fn test_tuple_and_array_roundtrip() {
        let value = (true, 'z', [3i64, -4], String::from("tail"));
        let bytes = to_bytes(&value).expect("encode should succeed");
        let decoded: (bool, char, [i64; 2], String) =
            from_bytes(&bytes).expect("decode should succeed");
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_wide_tuples_roundtrip() {
        let five = (1u8, 2u16, 3u32, 4u64, 5i8);
        let bytes = to_bytes(&five).expect("encode should succeed");
        assert_eq!(bytes.len(), 1 + 2 + 4 + 8 + 1);
        assert_eq!(
            from_bytes::<(u8, u16, u32, u64, i8)>(&bytes).expect("decode should succeed"),
            five
        );

        let twelve = (0u8, 1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8, 8u8, 9u8, 10u8, 11u8);
        let bytes = to_bytes(&twelve).expect("encode should succeed");
        assert_eq!(bytes, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        let decoded: (u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8) =
            from_bytes(&bytes).expect("decode should succeed");
        assert_eq!(decoded, twelve);
    }

    #[test]
    fn test_huge_declared_length_fails_without_allocating() {
        // varint u32::MAX followed by nothing
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        let err = from_bytes::<Vec<u64>>(&bytes).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
        let err = from_bytes::<Vec<u8>>(&bytes).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
        let err = from_bytes::<String>(&bytes).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
    }
}
