// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variant type tags.
//!
//! The tag is the index of the active alternative, written as the narrowest
//! signed integer whose maximum exceeds the number of alternatives. An absent
//! optional variant is the tag `-1` in that same width.

use crate::core::ser::{Cursor, Sink};
use crate::error::Result;

/// Tag value of an absent optional variant.
pub const ABSENT_TAG: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagWidth {
    I8,
    I16,
    I32,
    I64,
}

impl TagWidth {
    /// Width used for a variant over `count` alternatives.
    pub fn for_count(count: usize) -> Self {
        if count < i8::MAX as usize {
            TagWidth::I8
        } else if count < i16::MAX as usize {
            TagWidth::I16
        } else if count < i32::MAX as usize {
            TagWidth::I32
        } else {
            TagWidth::I64
        }
    }

    pub const fn size(self) -> usize {
        match self {
            TagWidth::I8 => 1,
            TagWidth::I16 => 2,
            TagWidth::I32 => 4,
            TagWidth::I64 => 8,
        }
    }

    /// `value` is an index below the alternative count, or [`ABSENT_TAG`].
    pub fn write(self, sink: &mut Sink<'_>, value: i64) {
        match self {
            TagWidth::I8 => sink.write_i8(value as i8),
            TagWidth::I16 => sink.write_i16(value as i16),
            TagWidth::I32 => sink.write_i32(value as i32),
            TagWidth::I64 => sink.write_i64(value),
        }
    }

    pub fn read(self, cursor: &mut Cursor<'_>) -> Result<i64> {
        Ok(match self {
            TagWidth::I8 => i64::from(cursor.read_i8()?),
            TagWidth::I16 => i64::from(cursor.read_i16()?),
            TagWidth::I32 => i64::from(cursor.read_i32()?),
            TagWidth::I64 => cursor.read_i64()?,
        })
    }
}
