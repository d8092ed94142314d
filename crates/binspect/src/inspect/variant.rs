// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Closed sets of alternative types.
//!
//! A variant lists the type ids of its alternatives in
//! [`VariantAccess::ALLOWED_TYPES`]; on the wire the active alternative is the
//! index into that list. Decoding validates the index, resolves the type id to
//! an alternative, decodes it into a fresh value and only then replaces the
//! destination, so a failed decode never leaves a half-written alternative.

use super::dispatch::save_value;
use super::traits::{Deserializer, Serializer};
use crate::error::{Error, ErrorCode, Result};
use crate::type_id::TypeId;

/// Access to the alternatives of a variant type.
///
/// Usually derived with `#[derive(Variant)]`.
pub trait VariantAccess: Sized {
    const NAME: &'static str;
    /// Type ids of the alternatives, in declaration order.
    const ALLOWED_TYPES: &'static [TypeId];

    /// Evaluated wherever the variant is encoded or decoded; fails the build
    /// when two alternatives share a type id.
    const DISTINCT_TYPES: () = assert_distinct_types(Self::ALLOWED_TYPES);

    /// Index of the active alternative in `ALLOWED_TYPES`.
    fn type_index(&self) -> usize;

    /// Encode the active alternative's value.
    fn save_active<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()>;

    /// Decode an alternative of type `type_id`; `None` if no alternative has it.
    fn load_alternative<D: Deserializer + ?Sized>(type_id: TypeId, f: &mut D) -> Result<Option<Self>>;
}

/// Panics (at compile time in const context) if `types` repeats an id.
/// The tag maps to an alternative through its type id, so ids must be unique.
pub const fn assert_distinct_types(types: &[TypeId]) {
    let mut i = 0;
    while i < types.len() {
        let mut j = i + 1;
        while j < types.len() {
            assert!(
                types[i] != types[j],
                "variant alternatives must have distinct type ids"
            );
            j += 1;
        }
        i += 1;
    }
}

pub fn save_variant_field<V, S>(value: &V, f: &mut S, name: &str) -> Result<()>
where
    V: VariantAccess,
    S: Serializer + ?Sized,
{
    let () = V::DISTINCT_TYPES;
    f.begin_variant_field(name, V::ALLOWED_TYPES, value.type_index())?;
    value.save_active(f)
}

pub fn save_optional_variant_field<V, S>(value: Option<&V>, f: &mut S, name: &str) -> Result<()>
where
    V: VariantAccess,
    S: Serializer + ?Sized,
{
    let () = V::DISTINCT_TYPES;
    match value {
        Some(value) => {
            f.begin_optional_variant_field(name, true, V::ALLOWED_TYPES, value.type_index())?;
            value.save_active(f)
        }
        None => f.begin_optional_variant_field(name, false, V::ALLOWED_TYPES, 0),
    }
}

fn load_at<V, D>(index: usize, f: &mut D, name: &str) -> Result<V>
where
    V: VariantAccess,
    D: Deserializer + ?Sized,
{
    let () = V::DISTINCT_TYPES;
    let type_id = *V::ALLOWED_TYPES.get(index).ok_or_else(|| {
        Error::with_context(ErrorCode::InvalidFieldType, format!("{name}: index {index}"))
    })?;
    V::load_alternative(type_id, f)?.ok_or_else(|| {
        log::debug!("[binspect] {} has no alternative with type id {type_id}", V::NAME);
        Error::with_context(ErrorCode::InvalidFieldType, format!("{name}: type id {type_id}"))
    })
}

pub fn load_variant_field<V, D>(slot: &mut V, f: &mut D, name: &str) -> Result<()>
where
    V: VariantAccess,
    D: Deserializer + ?Sized,
{
    let index = f.begin_variant_field(name, V::ALLOWED_TYPES)?;
    *slot = load_at(index, f, name)?;
    Ok(())
}

pub fn load_optional_variant_field<V, D>(slot: &mut Option<V>, f: &mut D, name: &str) -> Result<()>
where
    V: VariantAccess,
    D: Deserializer + ?Sized,
{
    *slot = match f.begin_optional_variant_field(name, V::ALLOWED_TYPES)? {
        Some(index) => Some(load_at(index, f, name)?),
        None => None,
    };
    Ok(())
}

/// Standalone variants are objects with a single variant field `value`.
pub fn save_variant<V, S>(value: &V, f: &mut S) -> Result<()>
where
    V: VariantAccess,
    S: Serializer + ?Sized,
{
    f.begin_object(crate::config::INVALID_TYPE_ID, V::NAME)?;
    save_variant_field(value, f, "value")?;
    f.end_field()?;
    f.end_object()
}

pub fn load_variant<V, D>(slot: &mut V, f: &mut D) -> Result<()>
where
    V: VariantAccess,
    D: Deserializer + ?Sized,
{
    f.begin_object(crate::config::INVALID_TYPE_ID, V::NAME)?;
    load_variant_field(slot, f, "value")?;
    f.end_field()?;
    f.end_object()
}

/// Encode one alternative's payload; used by derived `save_active`.
pub fn save_alternative<T, S>(value: &T, f: &mut S) -> Result<()>
where
    T: super::save::Save,
    S: Serializer + ?Sized,
{
    save_value(value, f)
}

/// Decode one alternative's payload into a default value.
pub fn load_alternative<T, D>(f: &mut D) -> Result<T>
where
    T: super::load::Load + Default,
    D: Deserializer + ?Sized,
{
    let mut value = T::default();
    super::dispatch::load_value(&mut value, f)?;
    Ok(value)
}

/// Implement `Categorized`, `Save` and `Load` for hand-written
/// [`VariantAccess`] types. The type must also implement `Default`.
#[macro_export]
macro_rules! impl_variant_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Categorized for $ty {
                const CATEGORY: $crate::Category = $crate::Category::Variant;
            }

            impl $crate::Save for $ty {
                fn save<S: $crate::Serializer + ?Sized>(&self, f: &mut S) -> $crate::Result<()> {
                    $crate::inspect::variant::save_variant(self, f)
                }

                fn save_field<S: $crate::Serializer + ?Sized>(
                    &self,
                    f: &mut S,
                    name: &str,
                ) -> $crate::Result<()> {
                    $crate::inspect::variant::save_variant_field(self, f, name)
                }

                fn save_optional_field<S: $crate::Serializer + ?Sized>(
                    value: Option<&Self>,
                    f: &mut S,
                    name: &str,
                ) -> $crate::Result<()> {
                    $crate::inspect::variant::save_optional_variant_field(value, f, name)
                }
            }

            impl $crate::Load for $ty {
                fn load<D: $crate::Deserializer + ?Sized>(&mut self, f: &mut D) -> $crate::Result<()> {
                    $crate::inspect::variant::load_variant(self, f)
                }

                fn load_field<D: $crate::Deserializer + ?Sized>(
                    &mut self,
                    f: &mut D,
                    name: &str,
                ) -> $crate::Result<()> {
                    $crate::inspect::variant::load_variant_field(self, f, name)
                }

                fn load_optional_field<D: $crate::Deserializer + ?Sized>(
                    slot: &mut Option<Self>,
                    f: &mut D,
                    name: &str,
                ) -> $crate::Result<()> {
                    $crate::inspect::variant::load_optional_variant_field(slot, f, name)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_id::HasTypeId;
    use crate::{from_bytes, to_bytes, BinaryDeserializer};

    #[derive(Debug, Clone, PartialEq)]
    enum Reading {
        Level(f64),
        Note(String),
    }

    impl Default for Reading {
        fn default() -> Self {
            Reading::Level(0.0)
        }
    }

    impl VariantAccess for Reading {
        const NAME: &'static str = "reading";
        const ALLOWED_TYPES: &'static [TypeId] =
            &[<f64 as HasTypeId>::TYPE_ID, <String as HasTypeId>::TYPE_ID];

        fn type_index(&self) -> usize {
            match self {
                Reading::Level(_) => 0,
                Reading::Note(_) => 1,
            }
        }

        fn save_active<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
            match self {
                Reading::Level(v) => save_alternative(v, f),
                Reading::Note(v) => save_alternative(v, f),
            }
        }

        fn load_alternative<D: Deserializer + ?Sized>(
            type_id: TypeId,
            f: &mut D,
        ) -> Result<Option<Self>> {
            if type_id == <f64 as HasTypeId>::TYPE_ID {
                return Ok(Some(Reading::Level(load_alternative(f)?)));
            }
            if type_id == <String as HasTypeId>::TYPE_ID {
                return Ok(Some(Reading::Note(load_alternative(f)?)));
            }
            Ok(None)
        }
    }

    crate::impl_variant_codec!(Reading);

    #[test]
    fn test_standalone_variant_encoding() {
        let bytes = to_bytes(&Reading::Note("ok".into())).expect("encode should succeed");
        assert_eq!(bytes, [0x01, 0x02, b'o', b'k']);
        let decoded: Reading = from_bytes(&bytes).expect("decode should succeed");
        assert_eq!(decoded, Reading::Note("ok".into()));
    }

    #[test]
    fn test_optional_variant_encoding() {
        assert_eq!(to_bytes(&None::<Reading>).expect("encode should succeed"), [0xFF]);
        let bytes = to_bytes(&Some(Reading::Level(1.0))).expect("encode should succeed");
        assert_eq!(bytes[0], 0x00);
        assert_eq!(&bytes[1..], &1.0f64.to_bits().to_be_bytes());

        let decoded: Option<Reading> = from_bytes(&[0xFF]).expect("decode should succeed");
        assert!(decoded.is_none());
    }

    #[test]
    fn test_out_of_bounds_tag_leaves_value_untouched() {
        let mut value = Reading::Note("keep".into());
        let mut de = BinaryDeserializer::new(&[0x02, 0x00]);
        let err = de.apply(&mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFieldType);
        assert_eq!(value, Reading::Note("keep".into()));
    }

    #[test]
    fn test_distinct_type_ids_accepted() {
        assert_distinct_types(&[]);
        assert_distinct_types(Reading::ALLOWED_TYPES);
        assert_distinct_types(&[1, 2, 3, 13]);
    }

    #[test]
    #[should_panic(expected = "distinct type ids")]
    fn test_repeated_type_id_rejected() {
        // two i32 alternatives
        assert_distinct_types(&[<i32 as HasTypeId>::TYPE_ID, 13, <i32 as HasTypeId>::TYPE_ID]);
    }

    #[test]
    fn test_failed_payload_leaves_value_untouched() {
        let mut value = Reading::Note("keep".into());
        // tag 1 (string) with a length that runs past the input
        let mut de = BinaryDeserializer::new(&[0x01, 0x09, b'x']);
        let err = de.apply(&mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
        assert_eq!(value, Reading::Note("keep".into()));
    }
}
