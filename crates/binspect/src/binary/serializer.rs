// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary encoder.
//!
//! Scopes write nothing; only element counts, presence bytes and variant tags
//! materialize on the wire. The encoder appends to (or patches) a caller-owned
//! buffer and never fails on I/O, only on values it cannot represent.

use std::any::type_name;

use super::tag::{TagWidth, ABSENT_TAG};
use crate::core::ser::{bits, varint, Sink};
use crate::error::{Error, ErrorCode, Result};
use crate::inspect::{save_value, Save, Serializer};
use crate::type_id::TypeId;

/// Encoder writing the binary format into a growable buffer.
///
/// # Example
///
/// ```
/// use binspect::BinarySerializer;
///
/// let mut buf = Vec::new();
/// let mut ser = BinarySerializer::new(&mut buf);
/// ser.apply(&(7u8, String::from("hi"))).expect("encode");
/// assert_eq!(buf, [7, 2, b'h', b'i']);
/// ```
pub struct BinarySerializer<'a> {
    sink: Sink<'a>,
}

impl<'a> BinarySerializer<'a> {
    /// Encoder positioned at the end of `buf`.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self {
            sink: Sink::new(buf),
        }
    }

    /// Encode `value` at the current write position.
    pub fn apply<T: Save + ?Sized>(&mut self, value: &T) -> Result<()> {
        let start = self.sink.write_pos();
        log::trace!(
            "[binspect] encoding {} at offset {start}",
            type_name::<T>()
        );
        save_value(value, self)?;
        log::trace!(
            "[binspect] encoded {} bytes",
            self.sink.write_pos() - start
        );
        Ok(())
    }

    /// Move the write position; subsequent writes overwrite in place.
    pub fn seek(&mut self, pos: usize) {
        self.sink.seek(pos);
    }

    /// Reserve `n` bytes, zero-filling past the end of the buffer.
    pub fn skip(&mut self, n: usize) {
        self.sink.skip(n);
    }

    pub fn write_pos(&self) -> usize {
        self.sink.write_pos()
    }

    pub fn buf(&self) -> &[u8] {
        self.sink.buf()
    }

    fn write_tag(&mut self, name: &str, types: &[TypeId], index: Option<usize>) -> Result<()> {
        let width = TagWidth::for_count(types.len());
        let tag = match index {
            Some(index) if index < types.len() => index as i64,
            Some(index) => {
                log::debug!(
                    "[binspect] variant field {name}: index {index} of {} alternatives",
                    types.len()
                );
                return Err(Error::with_context(ErrorCode::InvalidFieldType, name));
            }
            None => ABSENT_TAG,
        };
        width.write(&mut self.sink, tag);
        Ok(())
    }
}

impl Serializer for BinarySerializer<'_> {
    fn begin_object(&mut self, _type_id: TypeId, _name: &str) -> Result<()> {
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_field(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn begin_optional_field(&mut self, _name: &str, is_present: bool) -> Result<()> {
        self.sink.write_u8(u8::from(is_present));
        Ok(())
    }

    fn begin_variant_field(&mut self, name: &str, types: &[TypeId], index: usize) -> Result<()> {
        self.write_tag(name, types, Some(index))
    }

    fn begin_optional_variant_field(
        &mut self,
        name: &str,
        is_present: bool,
        types: &[TypeId],
        index: usize,
    ) -> Result<()> {
        self.write_tag(name, types, is_present.then_some(index))
    }

    fn end_field(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_tuple(&mut self, _size: usize) -> Result<()> {
        Ok(())
    }

    fn end_tuple(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_key_value_pair(&mut self) -> Result<()> {
        Ok(())
    }

    fn end_key_value_pair(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_sequence(&mut self, size: usize) -> Result<()> {
        varint::write_len(&mut self.sink, size)
    }

    fn end_sequence(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin_associative_array(&mut self, size: usize) -> Result<()> {
        varint::write_len(&mut self.sink, size)
    }

    fn end_associative_array(&mut self) -> Result<()> {
        Ok(())
    }

    fn value_bool(&mut self, value: bool) -> Result<()> {
        self.sink.write_u8(u8::from(value));
        Ok(())
    }

    fn value_i8(&mut self, value: i8) -> Result<()> {
        self.sink.write_i8(value);
        Ok(())
    }

    fn value_i16(&mut self, value: i16) -> Result<()> {
        self.sink.write_i16(value);
        Ok(())
    }

    fn value_i32(&mut self, value: i32) -> Result<()> {
        self.sink.write_i32(value);
        Ok(())
    }

    fn value_i64(&mut self, value: i64) -> Result<()> {
        self.sink.write_i64(value);
        Ok(())
    }

    fn value_u8(&mut self, value: u8) -> Result<()> {
        self.sink.write_u8(value);
        Ok(())
    }

    fn value_u16(&mut self, value: u16) -> Result<()> {
        self.sink.write_u16(value);
        Ok(())
    }

    fn value_u32(&mut self, value: u32) -> Result<()> {
        self.sink.write_u32(value);
        Ok(())
    }

    fn value_u64(&mut self, value: u64) -> Result<()> {
        self.sink.write_u64(value);
        Ok(())
    }

    fn value_f32(&mut self, value: f32) -> Result<()> {
        self.sink.write_f32(value);
        Ok(())
    }

    fn value_f64(&mut self, value: f64) -> Result<()> {
        self.sink.write_f64(value);
        Ok(())
    }

    fn value_long_double(&mut self, value: f64) -> Result<()> {
        // shortest text that parses back to the same value
        self.value_str(&value.to_string())
    }

    fn value_str(&mut self, value: &str) -> Result<()> {
        varint::write_len(&mut self.sink, value.len())?;
        self.sink.write_bytes(value.as_bytes());
        Ok(())
    }

    fn value_u16_string(&mut self, value: &[u16]) -> Result<()> {
        varint::write_len(&mut self.sink, value.len())?;
        for &unit in value {
            self.sink.write_u16(unit);
        }
        Ok(())
    }

    fn value_u32_string(&mut self, value: &[u32]) -> Result<()> {
        varint::write_len(&mut self.sink, value.len())?;
        for &unit in value {
            self.sink.write_u32(unit);
        }
        Ok(())
    }

    fn value_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.sink.write_bytes(value);
        Ok(())
    }

    fn value_bool_seq(&mut self, value: &[bool]) -> Result<()> {
        varint::write_len(&mut self.sink, value.len())?;
        self.sink.write_bytes(&bits::pack(value));
        Ok(())
    }
}
