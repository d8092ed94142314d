// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary decoder.
//!
//! Every length read from the input is checked against the remaining bytes
//! before anything is allocated, and every variant tag against the live list
//! of alternatives before it is used. Open scopes are counted so hostile
//! nesting fails with `DepthLimitExceeded` instead of exhausting the stack.

use std::any::type_name;

use super::tag::TagWidth;
use crate::config::DecodeConfig;
use crate::core::ser::{bits, varint, Cursor};
use crate::error::{Error, ErrorCode, Result};
use crate::inspect::{load_value, Deserializer, Load};
use crate::type_id::TypeId;

/// Decoder reading the binary format from a byte slice.
pub struct BinaryDeserializer<'a> {
    cursor: Cursor<'a>,
    config: DecodeConfig,
    depth: usize,
}

impl<'a> BinaryDeserializer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecodeConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: DecodeConfig) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Decode into `value` from the current position.
    ///
    /// On failure `value` may be partially updated; fields and variants that
    /// failed to decode keep their previous value.
    pub fn apply<T: Load + ?Sized>(&mut self, value: &mut T) -> Result<()> {
        log::trace!(
            "[binspect] decoding {} at offset {}",
            type_name::<T>(),
            self.cursor.offset()
        );
        // a failed session leaves its scopes open
        self.depth = 0;
        load_value(value, self)
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Unread part of the input.
    pub fn remainder(&self) -> &'a [u8] {
        self.cursor.remainder()
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Skip `n` bytes.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) {
        self.cursor.skip(n);
    }

    /// Rewind to the start of the input.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.depth = 0;
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            log::debug!(
                "[binspect] nesting limit {} reached at offset {}",
                self.config.max_depth,
                self.cursor.offset()
            );
            return Err(Error::with_context(
                ErrorCode::DepthLimitExceeded,
                format!("more than {} nested scopes", self.config.max_depth),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    /// Element count, bounded by the configured maximum.
    fn read_len(&mut self) -> Result<usize> {
        let len = varint::read_u32(&mut self.cursor)? as usize;
        if len > self.config.max_sequence_len {
            log::debug!(
                "[binspect] declared length {len} exceeds limit {}",
                self.config.max_sequence_len
            );
            return Err(Error::invalid_argument(format!(
                "length {len} exceeds limit {}",
                self.config.max_sequence_len
            )));
        }
        Ok(len)
    }

    /// Element count of a run of `unit`-byte items, checked against the input.
    fn read_units_len(&mut self, unit: usize) -> Result<usize> {
        let len = self.read_len()?;
        let bytes = len
            .checked_mul(unit)
            .ok_or_else(|| Error::invalid_argument(format!("length {len} overflows")))?;
        self.cursor.require(bytes)?;
        Ok(len)
    }

    fn read_tag(&mut self, name: &str, types: &[TypeId]) -> Result<Option<usize>> {
        let tag = TagWidth::for_count(types.len()).read(&mut self.cursor)?;
        if tag < 0 {
            return Ok(None);
        }
        match usize::try_from(tag) {
            Ok(index) if index < types.len() => Ok(Some(index)),
            _ => {
                log::debug!(
                    "[binspect] variant field {name}: tag {tag} out of {} alternatives",
                    types.len()
                );
                Err(Error::with_context(
                    ErrorCode::InvalidFieldType,
                    format!("{name}: tag {tag}"),
                ))
            }
        }
    }
}

impl Deserializer for BinaryDeserializer<'_> {
    fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    fn begin_object(&mut self, _type_id: TypeId, _name: &str) -> Result<()> {
        self.enter()
    }

    fn end_object(&mut self) -> Result<()> {
        self.leave()
    }

    fn begin_field(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn begin_optional_field(&mut self, _name: &str) -> Result<bool> {
        Ok(self.cursor.read_u8()? != 0)
    }

    fn begin_variant_field(&mut self, name: &str, types: &[TypeId]) -> Result<usize> {
        self.read_tag(name, types)?.ok_or_else(|| {
            Error::with_context(ErrorCode::InvalidFieldType, format!("{name}: missing tag"))
        })
    }

    fn begin_optional_variant_field(
        &mut self,
        name: &str,
        types: &[TypeId],
    ) -> Result<Option<usize>> {
        self.read_tag(name, types)
    }

    fn end_field(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_tuple(&mut self, _size: usize) -> Result<()> {
        self.enter()
    }

    fn end_tuple(&mut self) -> Result<()> {
        self.leave()
    }

    fn begin_key_value_pair(&mut self) -> Result<()> {
        Ok(())
    }

    fn end_key_value_pair(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_sequence(&mut self) -> Result<usize> {
        let len = self.read_len()?;
        self.enter()?;
        Ok(len)
    }

    fn end_sequence(&mut self) -> Result<()> {
        self.leave()
    }

    fn begin_associative_array(&mut self) -> Result<usize> {
        let len = self.read_len()?;
        self.enter()?;
        Ok(len)
    }

    fn end_associative_array(&mut self) -> Result<()> {
        self.leave()
    }

    fn value_bool(&mut self) -> Result<bool> {
        Ok(self.cursor.read_u8()? != 0)
    }

    fn value_i8(&mut self) -> Result<i8> {
        self.cursor.read_i8()
    }

    fn value_i16(&mut self) -> Result<i16> {
        self.cursor.read_i16()
    }

    fn value_i32(&mut self) -> Result<i32> {
        self.cursor.read_i32()
    }

    fn value_i64(&mut self) -> Result<i64> {
        self.cursor.read_i64()
    }

    fn value_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8()
    }

    fn value_u16(&mut self) -> Result<u16> {
        self.cursor.read_u16()
    }

    fn value_u32(&mut self) -> Result<u32> {
        self.cursor.read_u32()
    }

    fn value_u64(&mut self) -> Result<u64> {
        self.cursor.read_u64()
    }

    fn value_f32(&mut self) -> Result<f32> {
        self.cursor.read_f32()
    }

    fn value_f64(&mut self) -> Result<f64> {
        self.cursor.read_f64()
    }

    fn value_long_double(&mut self) -> Result<f64> {
        let text = self.value_string()?;
        text.trim().parse::<f64>().map_err(|_| {
            log::debug!("[binspect] unparsable long double text {text:?}");
            Error::invalid_argument(format!("long double text {text:?}"))
        })
    }

    fn value_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.cursor.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|err| Error::invalid_argument(format!("invalid UTF-8: {err}")))
    }

    fn value_u16_string(&mut self) -> Result<Vec<u16>> {
        let len = self.read_units_len(2)?;
        (0..len).map(|_| self.cursor.read_u16()).collect()
    }

    fn value_u32_string(&mut self) -> Result<Vec<u32>> {
        let len = self.read_units_len(4)?;
        (0..len).map(|_| self.cursor.read_u32()).collect()
    }

    fn value_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.cursor.read_bytes(len)?.to_vec())
    }

    fn value_bool_seq(&mut self, out: &mut Vec<bool>) -> Result<()> {
        let len = self.read_len()?;
        let packed = self.cursor.read_bytes(bits::packed_len(len))?;
        out.clear();
        bits::unpack(packed, len, out);
        Ok(())
    }
}
