// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive wire codec: network-order integers, IEEE-754 floats, varint
//! lengths and bit-packed booleans.

pub mod bits;
pub mod cursor;
pub mod varint;

pub use cursor::{Cursor, Sink};
