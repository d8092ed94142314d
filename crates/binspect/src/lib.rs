// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # binspect - inspector-driven structured binary codec
//!
//! Converts aggregate values (primitives, strings, sequences, maps, tuples,
//! optionals and closed sets of alternatives) to and from a compact binary
//! wire format that is not self-describing: the decoder must know the exact
//! static type.
//!
//! ## Quick Start
//!
//! ```rust
//! use binspect::{from_bytes, to_bytes, Inspect};
//!
//! #[derive(Debug, Default, PartialEq, Inspect)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! let tom = Person { name: "tom".into(), age: 10 };
//! let bytes = to_bytes(&tom).expect("encode");
//! assert_eq!(bytes, [0x03, b't', b'o', b'm', 0x00, 0x00, 0x00, 0x0A]);
//! assert_eq!(from_bytes::<Person>(&bytes).expect("decode"), tom);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Field protocol   Inspect / VariantAccess, fallbacks, sync    |
//! +---------------------------------------------------------------+
//! |  Dispatch engine  Save / Load per Category, list/map drivers  |
//! +---------------------------------------------------------------+
//! |  Format           BinarySerializer / BinaryDeserializer       |
//! +---------------------------------------------------------------+
//! |  Wire layers      Cursor / Sink, varint, bit packing          |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Wire format
//!
//! | Value | Encoding |
//! |-------|----------|
//! | integers | big-endian, declared width |
//! | floats | IEEE-754 bits through the integer path |
//! | long double | varint-prefixed decimal text |
//! | counts | base-128 varint, 32-bit payload |
//! | strings | varint count + code units |
//! | `Vec<bool>` | varint count + MSB-first packed bits |
//! | optional field | presence byte |
//! | variant field | narrowest signed index, `-1` when absent |

// Allow the derive macros to work inside this crate's tests
extern crate self as binspect;

/// Decoding/encoding of the binary wire format.
pub mod binary;
/// Wire constants and decode limits.
pub mod config;
/// Cursor, sink, varint and bit-packing layers.
pub mod core;
/// Error codes and the crate `Result`.
pub mod error;
/// Dispatch engine and field protocol.
pub mod inspect;
/// Type-identifier registry.
pub mod type_id;

pub use binary::{BinaryDeserializer, BinarySerializer};
pub use config::DecodeConfig;
pub use error::{Error, ErrorCode, Result};
pub use inspect::{
    Categorized, Category, Deserializer, Field, FieldVisitor, Inspect, Load, LongDouble, Save,
    Serializer, SetterOutcome, U16String, U32String, VariantAccess, VirtualField,
};
pub use type_id::{HasTypeId, TypeId, TypeRegistry};

#[cfg(feature = "derive")]
pub use binspect_derive::{Inspect, Variant};

/// Encode `value` into a fresh buffer.
pub fn to_bytes<T: Save + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_bytes_into(&mut buf, value)?;
    Ok(buf)
}

/// Append the encoding of `value` to `buf`.
pub fn to_bytes_into<T: Save + ?Sized>(buf: &mut Vec<u8>, value: &T) -> Result<()> {
    BinarySerializer::new(buf).apply(value)
}

/// Decode a `T` from the start of `bytes`; trailing bytes are ignored.
pub fn from_bytes<T: Load + Default>(bytes: &[u8]) -> Result<T> {
    from_bytes_with(bytes, DecodeConfig::default())
}

/// Decode a `T` with explicit decode limits.
pub fn from_bytes_with<T: Load + Default>(bytes: &[u8], config: DecodeConfig) -> Result<T> {
    let mut value = T::default();
    BinaryDeserializer::with_config(bytes, config).apply(&mut value)?;
    Ok(value)
}
