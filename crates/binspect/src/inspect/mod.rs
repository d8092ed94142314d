// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Dispatch engine and field protocol
//!
//! | Module | Description |
//! |--------|-------------|
//! | `traits` | `Serializer` / `Deserializer` format contracts |
//! | `category` | Per-type traversal category |
//! | `save`, `load` | Encode/decode strategies for std types |
//! | `dispatch` | Category routing, list and map drivers |
//! | `leaf` | Builtin leaves, long double, wide strings |
//! | `field` | Field descriptors, fallbacks, invariants, setters |
//! | `object` | Plain objects (`Inspect`) |
//! | `variant` | Closed alternative sets (`VariantAccess`) |
//! | `time` | `Duration` and `SystemTime` |

pub mod category;
pub mod dispatch;
pub mod field;
pub mod leaf;
pub mod load;
pub mod object;
pub mod save;
pub mod time;
pub mod traits;
pub mod variant;

pub use category::{Categorized, Category};
pub use dispatch::{load_value, save_value};
pub use field::{Fallback, Field, FieldVisitor, SetterOutcome, VirtualField};
pub use leaf::{LongDouble, U16String, U32String};
pub use load::Load;
pub use object::{load_object, save_object, FieldLoader, FieldSaver, Inspect};
pub use save::Save;
pub use traits::{Deserializer, Serializer};
pub use variant::VariantAccess;
