// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Core wire layers
//!
//! Byte-level building blocks shared by every format.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `ser::cursor` | Bounds-checked decode `Cursor`, growable encode `Sink` |
//! | `ser::varint` | Base-128 sequence-length encoding |
//! | `ser::bits` | MSB-first boolean-sequence packing |

pub mod ser;
