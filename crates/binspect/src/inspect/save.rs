// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode half of the dispatch engine.
//!
//! [`Save`] is implemented once per type. Besides `save`, the trait carries
//! three hooks with list/field defaults that some categories replace:
//!
//! - `save_field`: optionals and variants write their own presence/tag header.
//! - `save_optional_field`: variants fold absence into the tag.
//! - `save_slice`: booleans bit-pack, bytes go out as one block.

use std::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use super::category::{Categorized, Category};
use super::dispatch::{save_list, save_map, save_value};
use super::traits::Serializer;
use crate::config::INVALID_TYPE_ID;
use crate::error::{Error, Result};

/// Types that can be written to a [`Serializer`].
pub trait Save: Categorized {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()>;

    /// Open a required field named `name` and write the value.
    /// The caller closes the field.
    fn save_field<S: Serializer + ?Sized>(&self, f: &mut S, name: &str) -> Result<()> {
        f.begin_field(name)?;
        save_value(self, f)
    }

    /// Open an optional field and write the value if present.
    /// The caller closes the field.
    fn save_optional_field<S: Serializer + ?Sized>(
        value: Option<&Self>,
        f: &mut S,
        name: &str,
    ) -> Result<()>
    where
        Self: Sized,
    {
        f.begin_optional_field(name, value.is_some())?;
        match value {
            Some(value) => save_value(value, f),
            None => Ok(()),
        }
    }

    /// Write a homogeneous run of values as a sequence.
    fn save_slice<S: Serializer + ?Sized>(items: &[Self], f: &mut S) -> Result<()>
    where
        Self: Sized,
    {
        save_list(items.len(), items, f)
    }
}

macro_rules! impl_category {
    ($category:ident => $($ty:ty),* $(,)?) => {
        $(
            impl<T: Categorized> Categorized for $ty {
                const CATEGORY: Category = Category::$category.containing(T::CATEGORY);
            }
        )*
    };
}

impl_category!(List => Vec<T>, VecDeque<T>, LinkedList<T>, BTreeSet<T>);
impl_category!(Optional => Option<T>);

impl<T: Categorized> Categorized for [T] {
    const CATEGORY: Category = Category::List.containing(T::CATEGORY);
}

impl<T: Categorized, const N: usize> Categorized for [T; N] {
    const CATEGORY: Category = Category::Tuple.containing(T::CATEGORY);
}

impl<K: Categorized, V: Categorized> Categorized for BTreeMap<K, V> {
    const CATEGORY: Category = Category::Map
        .containing(K::CATEGORY)
        .containing(V::CATEGORY);
}

impl<T: Categorized + ?Sized> Categorized for Box<T> {
    const CATEGORY: Category = T::CATEGORY;
}

impl<T: Categorized + ?Sized> Categorized for Rc<T> {
    const CATEGORY: Category = T::CATEGORY;
}

impl<T: Categorized + ?Sized> Categorized for Arc<T> {
    const CATEGORY: Category = T::CATEGORY;
}

impl<T: ?Sized> Categorized for PhantomData<T> {
    const CATEGORY: Category = Category::CustomHook;
}

impl<T: ?Sized> Categorized for *const T {
    const CATEGORY: Category = Category::Unsupported;
}

impl<T: ?Sized> Categorized for *mut T {
    const CATEGORY: Category = Category::Unsupported;
}

impl<T: Save> Save for [T] {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        T::save_slice(self, f)
    }
}

impl<T: Save> Save for Vec<T> {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        T::save_slice(self, f)
    }
}

impl<T: Save> Save for VecDeque<T> {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        save_list(self.len(), self, f)
    }
}

impl<T: Save> Save for LinkedList<T> {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        save_list(self.len(), self, f)
    }
}

impl<T: Save> Save for BTreeSet<T> {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        save_list(self.len(), self, f)
    }
}

impl<K: Save, V: Save> Save for BTreeMap<K, V> {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        save_map(self.len(), self, f)
    }
}

impl<T: Save, const N: usize> Save for [T; N] {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.begin_tuple(N)?;
        for item in self {
            save_value(item, f)?;
        }
        f.end_tuple()
    }
}

/// Standalone optionals are objects with a single optional field `value`.
impl<T: Save> Save for Option<T> {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.begin_object(INVALID_TYPE_ID, "optional")?;
        T::save_optional_field(self.as_ref(), f, "value")?;
        f.end_field()?;
        f.end_object()
    }

    fn save_field<S: Serializer + ?Sized>(&self, f: &mut S, name: &str) -> Result<()> {
        T::save_optional_field(self.as_ref(), f, name)
    }
}

/// Smart pointers are transparent: the pointee decides every hook, so a boxed
/// variant still folds absence into its tag.
macro_rules! impl_save_pointer {
    ($($ptr:ident),+) => {
        $(
            impl<T: Save> Save for $ptr<T> {
                fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
                    (**self).save(f)
                }

                fn save_field<S: Serializer + ?Sized>(&self, f: &mut S, name: &str) -> Result<()> {
                    (**self).save_field(f, name)
                }

                fn save_optional_field<S: Serializer + ?Sized>(
                    value: Option<&Self>,
                    f: &mut S,
                    name: &str,
                ) -> Result<()> {
                    T::save_optional_field(value.map(|inner| &**inner), f, name)
                }
            }

            impl<T: Save> Save for $ptr<[T]> {
                fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
                    (**self).save(f)
                }
            }

            impl Save for $ptr<str> {
                fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
                    (**self).save(f)
                }
            }
        )+
    };
}

impl_save_pointer!(Box, Rc, Arc);

impl<T: ?Sized> Save for PhantomData<T> {
    fn save<S: Serializer + ?Sized>(&self, _f: &mut S) -> Result<()> {
        Ok(())
    }
}

impl<T: ?Sized> Save for *const T {
    fn save<S: Serializer + ?Sized>(&self, _f: &mut S) -> Result<()> {
        Err(Error::unsafe_type(std::any::type_name::<Self>()))
    }
}

impl<T: ?Sized> Save for *mut T {
    fn save<S: Serializer + ?Sized>(&self, _f: &mut S) -> Result<()> {
        Err(Error::unsafe_type(std::any::type_name::<Self>()))
    }
}

macro_rules! impl_save_tuple {
    ($len:expr => $($name:ident $idx:tt),+) => {
        impl<$($name: Categorized),+> Categorized for ($($name,)+) {
            const CATEGORY: Category = Category::Tuple$(.containing($name::CATEGORY))+;
        }

        impl<$($name: Save),+> Save for ($($name,)+) {
            fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
                f.begin_tuple($len)?;
                $(save_value(&self.$idx, f)?;)+
                f.end_tuple()
            }
        }
    };
}

impl_save_tuple!(1 => A 0);
impl_save_tuple!(2 => A 0, B 1);
impl_save_tuple!(3 => A 0, B 1, C 2);
impl_save_tuple!(4 => A 0, B 1, C 2, D 3);
impl_save_tuple!(5 => A 0, B 1, C 2, D 3, E 4);
impl_save_tuple!(6 => A 0, B 1, C 2, D 3, E 4, F 5);
impl_save_tuple!(7 => A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_save_tuple!(8 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_save_tuple!(9 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
impl_save_tuple!(10 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
impl_save_tuple!(11 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
impl_save_tuple!(12 => A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

impl Categorized for () {
    const CATEGORY: Category = Category::Tuple;
}

impl Save for () {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        f.begin_tuple(0)?;
        f.end_tuple()
    }
}

/// Mark types as having no wire representation.
///
/// Any attempt to encode or decode them fails with `UnsafeType`.
///
/// ```
/// struct FileHandle(i32);
/// binspect::impl_unsafe_type!(FileHandle);
///
/// let err = binspect::to_bytes(&FileHandle(3)).unwrap_err();
/// assert_eq!(err.code(), binspect::ErrorCode::UnsafeType);
/// ```
#[macro_export]
macro_rules! impl_unsafe_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Categorized for $ty {
                const CATEGORY: $crate::Category = $crate::Category::Unsupported;
            }

            impl $crate::Save for $ty {
                fn save<S: $crate::Serializer + ?Sized>(&self, _f: &mut S) -> $crate::Result<()> {
                    Err($crate::Error::with_context(
                        $crate::ErrorCode::UnsafeType,
                        stringify!($ty),
                    ))
                }
            }

            impl $crate::Load for $ty {
                fn load<D: $crate::Deserializer + ?Sized>(&mut self, _f: &mut D) -> $crate::Result<()> {
                    Err($crate::Error::with_context(
                        $crate::ErrorCode::UnsafeType,
                        stringify!($ty),
                    ))
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::to_bytes;

    #[test]
    fn test_vec_and_slice_share_encoding() {
        let values = vec![1u16, 2, 3];
        let from_vec = to_bytes(&values).expect("encode should succeed");
        let from_slice = to_bytes(values.as_slice()).expect("encode should succeed");
        assert_eq!(from_vec, from_slice);
        assert_eq!(from_vec, [0x03, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03]);
    }

    #[test]
    fn test_byte_vec_is_raw_block() {
        let bytes = to_bytes(&vec![0xDEu8, 0xAD]).expect("encode should succeed");
        assert_eq!(bytes, [0x02, 0xDE, 0xAD]);
    }

    #[test]
    fn test_array_has_no_length_prefix() {
        let bytes = to_bytes(&[1u8, 2, 3]).expect("encode should succeed");
        assert_eq!(bytes, [1, 2, 3]);
    }

    #[test]
    fn test_tuple_elements_in_order() {
        let bytes = to_bytes(&(1u8, String::from("x"), -1i16)).expect("encode should succeed");
        assert_eq!(bytes, [0x01, 0x01, b'x', 0xFF, 0xFF]);
    }

    #[test]
    fn test_map_pairs_sorted_by_key() {
        let mut map = BTreeMap::new();
        map.insert(2u8, 20u8);
        map.insert(1u8, 10u8);
        let bytes = to_bytes(&map).expect("encode should succeed");
        assert_eq!(bytes, [0x02, 1, 10, 2, 20]);
    }

    #[test]
    fn test_standalone_option() {
        assert_eq!(to_bytes(&Some(5u8)).expect("encode should succeed"), [1, 5]);
        assert_eq!(to_bytes(&None::<u8>).expect("encode should succeed"), [0]);
    }

    #[test]
    fn test_smart_pointers_are_transparent() {
        let plain = to_bytes(&7u32).expect("encode should succeed");
        assert_eq!(to_bytes(&Box::new(7u32)).expect("encode should succeed"), plain);
        assert_eq!(to_bytes(&Rc::new(7u32)).expect("encode should succeed"), plain);
        assert_eq!(to_bytes(&Arc::new(7u32)).expect("encode should succeed"), plain);
        assert!(to_bytes(&PhantomData::<String>)
            .expect("encode should succeed")
            .is_empty());
        assert!(to_bytes(&()).expect("encode should succeed").is_empty());
    }

    #[test]
    fn test_raw_pointer_is_unsafe() {
        let value = 3u8;
        let ptr: *const u8 = &value;
        let err = to_bytes(&ptr).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsafeType);

        let err = to_bytes(&vec![ptr]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsafeType);
    }
}
