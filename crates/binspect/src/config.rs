// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and decode-session configuration.
//!
//! All format constants live here. **Never hardcode them elsewhere.**
//!
//! # Example
//!
//! ```
//! use binspect::config::DecodeConfig;
//!
//! let config = DecodeConfig::default()
//!     .with_max_depth(32)
//!     .with_max_sequence_len(1 << 20);
//! assert_eq!(config.max_depth, 32);
//! ```

use crate::type_id::TypeId;

/// Maximum number of 7-bit groups in a sequence-length varint (32-bit payload).
pub const VARINT_MAX_BYTES: usize = 5;

/// Payload bits carried by one varint group.
pub const VARINT_GROUP_BITS: u32 = 7;

/// Continuation flag of a varint group.
pub const VARINT_CONTINUATION: u8 = 0x80;

/// Booleans packed into one byte of a boolean sequence.
pub const BOOLS_PER_BYTE: usize = 8;

/// Type id reserved for "no type".
pub const INVALID_TYPE_ID: TypeId = 65535;

/// First type id available to user-defined types; lower ids are builtin.
pub const FIRST_CUSTOM_TYPE_ID: TypeId = 200;

/// Default maximum nesting of scopes accepted by a decode session.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default bound on declared element counts (no limit beyond the 32-bit wire).
///
/// Counts of sized elements are also bounded by the remaining input. Elements
/// that occupy no bytes (`()`, `PhantomData`, field-less objects) are not, so
/// decoding `Vec<()>` from untrusted input loops up to this many times; lower
/// it with [`DecodeConfig::with_max_sequence_len`] for such types.
pub const DEFAULT_MAX_SEQUENCE_LEN: usize = u32::MAX as usize;

/// Limits applied by a [`BinaryDeserializer`](crate::BinaryDeserializer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum number of simultaneously open object/tuple/sequence/map scopes.
    pub max_depth: usize,
    /// Largest element count accepted from a sequence, map or string length.
    /// The only bound on sequences of zero-sized elements.
    pub max_sequence_len: usize,
}

impl DecodeConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_sequence_len(mut self, max_sequence_len: usize) -> Self {
        self.max_sequence_len = max_sequence_len;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
        }
    }
}
