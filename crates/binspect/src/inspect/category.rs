// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Traversal categories.
//!
//! Every inspectable type belongs to exactly one [`Category`], fixed at
//! compile time through [`Categorized::CATEGORY`]. The category decides which
//! traversal strategy the dispatch engine applies; `Unsupported` types are
//! rejected with `UnsafeType` before any byte is read or written.
//!
//! When a type could match several strategies, the first match in this order
//! wins: custom hook, builtin leaf, tuple, map, list, none. Plain objects and
//! variants are explicit opt-ins (`#[derive(Inspect)]`, `#[derive(Variant)]`)
//! and optionals are `Option<T>`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Directly wire-representable leaf.
    Builtin,
    /// Type drives its own traversal.
    CustomHook,
    /// Aggregate of named fields.
    PlainObject,
    /// Fixed-arity heterogeneous sequence.
    Tuple,
    /// Homogeneous variable-length sequence.
    List,
    /// Ordered key/value sequence with unique keys.
    Map,
    /// Zero or one value.
    Optional,
    /// Exactly one of a closed set of alternatives.
    Variant,
    /// No wire representation; traversal fails.
    Unsupported,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Builtin => "builtin",
            Category::CustomHook => "custom_hook",
            Category::PlainObject => "plain_object",
            Category::Tuple => "tuple",
            Category::List => "list",
            Category::Map => "map",
            Category::Optional => "optional",
            Category::Variant => "variant",
            Category::Unsupported => "unsupported",
        }
    }

    /// `self`, unless `element` is `Unsupported`.
    ///
    /// Containers take on the category of an unsupported element so that an
    /// empty `Vec<*const u8>` or a `None::<Handle>` is rejected like the
    /// element itself.
    pub const fn containing(self, element: Category) -> Category {
        match element {
            Category::Unsupported => Category::Unsupported,
            _ => self,
        }
    }

    /// Whether values of this category open a scope on the wire.
    pub const fn is_aggregate(self) -> bool {
        !matches!(
            self,
            Category::Builtin | Category::CustomHook | Category::Unsupported
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile-time classification of a type.
pub trait Categorized {
    const CATEGORY: Category;
}
