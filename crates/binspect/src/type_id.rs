// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-identifier registry.
//!
//! Every type that may appear as a variant alternative carries a small stable
//! integer ([`HasTypeId`]). Builtin ids are fixed; user types start at
//! [`FIRST_CUSTOM_TYPE_ID`]. A [`TypeRegistry`] is the explicit registration
//! step that maps ids back to names and checks completeness. It may be
//! installed process-wide once, before any encode/decode runs.
//!
//! # Example
//!
//! ```
//! use binspect::type_id::{HasTypeId, TypeRegistry};
//!
//! let registry = TypeRegistry::builder()
//!     .register::<i32>()
//!     .register::<String>()
//!     .build()
//!     .expect("ids are unique");
//! assert_eq!(registry.name_of(<i32 as HasTypeId>::TYPE_ID), Some("int32_t"));
//! assert!(registry.is_registered::<String>());
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::config::{FIRST_CUSTOM_TYPE_ID, INVALID_TYPE_ID};
use crate::error::{Error, ErrorCode, Result};
use crate::inspect::leaf::{LongDouble, U16String, U32String};

/// Stable identifier of a serializable type.
pub type TypeId = u16;

/// Associates a type with its stable id and display name.
pub trait HasTypeId {
    const TYPE_ID: TypeId;
    const TYPE_NAME: &'static str;
}

macro_rules! builtin_type_ids {
    ($($ty:ty => $id:expr, $name:expr;)*) => {
        $(
            impl HasTypeId for $ty {
                const TYPE_ID: TypeId = $id;
                const TYPE_NAME: &'static str = $name;
            }
        )*

        const BUILTIN_TYPES: &[(TypeId, &str)] = &[$(($id, $name)),*];
    };
}

builtin_type_ids! {
    bool => 1, "bool";
    f64 => 2, "double";
    f32 => 3, "float";
    i16 => 4, "int16_t";
    i32 => 5, "int32_t";
    i64 => 6, "int64_t";
    i8 => 7, "int8_t";
    LongDouble => 8, "ldouble";
    u16 => 9, "uint16_t";
    u32 => 10, "uint32_t";
    u64 => 11, "uint64_t";
    u8 => 12, "uint8_t";
    String => 13, "std::string";
    U16String => 14, "std::u16string";
    U32String => 15, "std::u32string";
    std::collections::BTreeSet<String> => 16, "std::set<std::string>";
}

/// Immutable id -> name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    names: BTreeMap<TypeId, &'static str>,
}

/// Collects registrations; duplicates are reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    entries: Vec<(TypeId, &'static str)>,
}

impl TypeRegistryBuilder {
    pub fn register<T: HasTypeId>(self) -> Self {
        self.register_raw(T::TYPE_ID, T::TYPE_NAME)
    }

    pub fn register_raw(mut self, id: TypeId, name: &'static str) -> Self {
        self.entries.push((id, name));
        self
    }

    /// Seed with the builtin table.
    pub fn with_builtins(mut self) -> Self {
        self.entries.extend_from_slice(BUILTIN_TYPES);
        self
    }

    pub fn build(self) -> Result<TypeRegistry> {
        let mut names = BTreeMap::new();
        for (id, name) in self.entries {
            if id == INVALID_TYPE_ID {
                return Err(Error::with_context(
                    ErrorCode::InvalidArgument,
                    format!("type {name} uses the reserved invalid id"),
                ));
            }
            if let Some(existing) = names.insert(id, name) {
                if existing != name {
                    return Err(Error::with_context(
                        ErrorCode::RuntimeError,
                        format!("type id {id} registered for both {existing} and {name}"),
                    ));
                }
            }
        }
        Ok(TypeRegistry { names })
    }
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Registry containing only the builtin ids.
    pub fn builtins() -> Self {
        Self {
            names: BUILTIN_TYPES.iter().copied().collect(),
        }
    }

    pub fn name_of(&self, id: TypeId) -> Option<&'static str> {
        self.names.get(&id).copied()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn is_registered<T: HasTypeId>(&self) -> bool {
        self.name_of(T::TYPE_ID) == Some(T::TYPE_NAME)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of registered ids in the user range.
    pub fn custom_count(&self) -> usize {
        self.names.range(FIRST_CUSTOM_TYPE_ID..).count()
    }

    /// Install the process-wide registry; fails if one is already installed.
    pub fn install(registry: TypeRegistry) -> Result<()> {
        log::trace!(
            "[binspect] installing type registry with {} entries",
            registry.len()
        );
        GLOBAL.set(registry).map_err(|_| {
            Error::with_context(ErrorCode::RuntimeError, "type registry already installed")
        })
    }

    /// Process-wide registry, or the builtin table if none was installed.
    pub fn global() -> &'static TypeRegistry {
        static BUILTINS: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL
            .get()
            .unwrap_or_else(|| BUILTINS.get_or_init(TypeRegistry::builtins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point;
    impl HasTypeId for Point {
        const TYPE_ID: TypeId = FIRST_CUSTOM_TYPE_ID;
        const TYPE_NAME: &'static str = "point";
    }

    struct Clash;
    impl HasTypeId for Clash {
        const TYPE_ID: TypeId = FIRST_CUSTOM_TYPE_ID;
        const TYPE_NAME: &'static str = "clash";
    }

    #[test]
    fn test_builtin_ids() {
        assert_eq!(<bool as HasTypeId>::TYPE_ID, 1);
        assert_eq!(<String as HasTypeId>::TYPE_ID, 13);
        assert_eq!(<LongDouble as HasTypeId>::TYPE_ID, 8);
        let registry = TypeRegistry::builtins();
        assert_eq!(registry.len(), 16);
        assert_eq!(registry.name_of(16), Some("std::set<std::string>"));
        assert_eq!(registry.custom_count(), 0);
    }

    #[test]
    fn test_register_custom_type() {
        let registry = TypeRegistry::builder()
            .with_builtins()
            .register::<Point>()
            .build()
            .expect("registry build should succeed");
        assert!(registry.is_registered::<Point>());
        assert!(registry.contains(FIRST_CUSTOM_TYPE_ID));
        assert_eq!(registry.custom_count(), 1);
        assert!(!registry.is_registered::<Clash>());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = TypeRegistry::builder()
            .register::<Point>()
            .register::<Clash>()
            .build()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::RuntimeError);

        // Registering the same type twice is harmless.
        TypeRegistry::builder()
            .register::<Point>()
            .register::<Point>()
            .build()
            .expect("repeated registration should succeed");
    }

    #[test]
    fn test_invalid_id_rejected() {
        let err = TypeRegistry::builder()
            .register_raw(INVALID_TYPE_ID, "nothing")
            .build()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_global_falls_back_to_builtins() {
        assert!(TypeRegistry::global().is_registered::<i64>());
    }
}
