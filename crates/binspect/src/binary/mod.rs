// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The binary wire format.
//!
//! Not self-describing: no delimiters, no embedded type names, no trailer.
//! Only a decoder that knows the exact static type can read it back.

pub mod deserializer;
pub mod serializer;
pub mod tag;

pub use deserializer::BinaryDeserializer;
pub use serializer::BinarySerializer;
pub use tag::TagWidth;
