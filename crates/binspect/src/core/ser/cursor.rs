// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte cursors for the binary wire format.
//!
//! [`Cursor`] is the decode side: an immutable view over the input plus a
//! read offset that never leaves `[0, len]`. [`Sink`] is the encode side: a
//! growable buffer plus a write position that may sit below the buffer length
//! so that callers can seek back and patch previously written bytes.
//!
//! Multi-byte integers always travel in network (big-endian) byte order;
//! `to_be_bytes`/`from_be_bytes` compile to plain copies on big-endian hosts.

use crate::error::{Error, Result};

/// Generate big-endian write methods for primitive types.
macro_rules! impl_write_be {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.write_bytes(&value.to_be_bytes());
        }
    };
}

/// Generate big-endian read methods for primitive types.
///
/// Each generated method checks bounds (returns `EndOfStream` on overflow),
/// copies the bytes out and advances the offset.
macro_rules! impl_read_be {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self) -> Result<$type> {
            const SIZE: usize = std::mem::size_of::<$type>();
            let mut bytes = [0u8; SIZE];
            bytes.copy_from_slice(self.read_bytes(SIZE)?);
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Encode-side cursor over a growable buffer.
///
/// Writing at `write_pos == buf.len()` appends, writing below it overwrites in
/// place, and a write straddling the end overwrites what exists and appends
/// the rest. `write_pos <= buf.len()` holds after every operation.
pub struct Sink<'a> {
    buf: &'a mut Vec<u8>,
    write_pos: usize,
}

impl<'a> Sink<'a> {
    /// Sink positioned at the end of `buf` (existing content is kept).
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        let write_pos = buf.len();
        Self { buf, write_pos }
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    pub fn buf(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Move the write position; positions past the end are clamped to it.
    pub fn seek(&mut self, pos: usize) {
        self.write_pos = pos.min(self.buf.len());
    }

    /// Advance by `n` bytes, zero-filling whatever lies past the buffer end.
    pub fn skip(&mut self, n: usize) {
        let end = self.write_pos + n;
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.write_pos = end;
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    impl_write_be!(write_u16, u16);
    impl_write_be!(write_u32, u32);
    impl_write_be!(write_u64, u64);
    impl_write_be!(write_i8, i8);
    impl_write_be!(write_i16, i16);
    impl_write_be!(write_i32, i32);
    impl_write_be!(write_i64, i64);

    /// IEEE-754 single, sent through the 32-bit integer path.
    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    /// IEEE-754 double, sent through the 64-bit integer path.
    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        let pos = self.write_pos;
        let len = self.buf.len();
        if pos == len {
            self.buf.extend_from_slice(data);
        } else if pos + data.len() <= len {
            self.buf[pos..pos + data.len()].copy_from_slice(data);
        } else {
            let (inside, outside) = data.split_at(len - pos);
            self.buf[pos..].copy_from_slice(inside);
            self.buf.extend_from_slice(outside);
        }
        self.write_pos += data.len();
    }
}

/// Decode-side cursor (bounds-checked, zero-copy).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// Unread part of the input.
    pub fn remainder(&self) -> &'a [u8] {
        &self.buffer[self.offset..]
    }

    pub fn is_eof(&self) -> bool {
        self.offset == self.buffer.len()
    }

    /// Rewind to the start of the input.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Advance without reading.
    ///
    /// # Panics
    ///
    /// Skipping past the end of the input is a caller bug and panics.
    pub fn skip(&mut self, n: usize) {
        assert!(
            n <= self.remaining(),
            "skip of {n} bytes past end of input ({} remaining)",
            self.remaining()
        );
        self.offset += n;
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        match self.buffer.get(self.offset) {
            Some(&byte) => {
                self.offset += 1;
                Ok(byte)
            }
            None => Err(Error::end_of_stream(self.offset, 1)),
        }
    }

    impl_read_be!(read_u16, u16);
    impl_read_be!(read_u32, u32);
    impl_read_be!(read_u64, u64);
    impl_read_be!(read_i8, i8);
    impl_read_be!(read_i16, i16);
    impl_read_be!(read_i32, i32);
    impl_read_be!(read_i64, i64);

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::end_of_stream(self.offset, len));
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Fails with `EndOfStream` unless `len` bytes are left, without consuming.
    pub fn require(&self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(Error::end_of_stream(self.offset, len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_sink_writes_network_order() {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        sink.write_u16(TEST_U16);
        sink.write_u32(TEST_U32);
        sink.write_i32(-2);
        assert_eq!(
            buf,
            [0xCD, 0xEF, 0x12, 0x34, 0x56, 0x78, 0xFF, 0xFF, 0xFF, 0xFE]
        );
    }

    #[test]
    fn test_cursor_reads_network_order() {
        let bytes = TEST_U64.to_be_bytes();
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(cursor.read_u64().expect("read u64 should succeed"), TEST_U64);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_float_bits_roundtrip() {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        sink.write_f32(1.5);
        sink.write_f64(-0.0);
        sink.write_f64(f64::NAN);
        assert_eq!(&buf[..4], &0x3FC0_0000u32.to_be_bytes());

        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.read_f32().expect("read f32 should succeed"), 1.5);
        let neg_zero = cursor.read_f64().expect("read f64 should succeed");
        assert!(neg_zero == 0.0 && neg_zero.is_sign_negative());
        assert!(cursor.read_f64().expect("read f64 should succeed").is_nan());
    }

    #[test]
    fn test_sink_appends_to_existing_content() {
        let mut buf = vec![0xAA];
        let mut sink = Sink::new(&mut buf);
        assert_eq!(sink.write_pos(), 1);
        sink.write_u8(0xBB);
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_sink_overwrite_in_place() {
        let mut buf = vec![1, 2, 3, 4];
        let mut sink = Sink::new(&mut buf);
        sink.seek(1);
        sink.write_bytes(&[9, 9]);
        assert_eq!(sink.write_pos(), 3);
        assert_eq!(buf, [1, 9, 9, 4]);
    }

    #[test]
    fn test_sink_write_straddling_end() {
        let mut buf = vec![1, 2, 3];
        let mut sink = Sink::new(&mut buf);
        sink.seek(2);
        sink.write_bytes(&[7, 8, 9]);
        assert_eq!(sink.write_pos(), 5);
        assert_eq!(buf, [1, 2, 7, 8, 9]);
    }

    #[test]
    fn test_sink_skip_zero_fills() {
        let mut buf = vec![5];
        let mut sink = Sink::new(&mut buf);
        sink.skip(3);
        sink.write_u8(6);
        assert_eq!(buf, [5, 0, 0, 0, 6]);

        let mut sink = Sink::new(&mut buf);
        sink.seek(0);
        sink.skip(2);
        assert_eq!(sink.write_pos(), 2);
        assert_eq!(sink.buf().len(), 5);
    }

    #[test]
    fn test_cursor_read_overflow_reports_offset() {
        let buffer = [0u8; 1];
        let mut cursor = Cursor::new(&buffer);
        assert_eq!(cursor.read_u8().expect("read u8 should succeed"), 0);

        let err = cursor.read_u8().unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
        assert_eq!(cursor.offset(), 1);

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
    }

    #[test]
    fn test_cursor_partial_read_does_not_advance() {
        let buffer = [1u8, 2, 3];
        let mut cursor = Cursor::new(&buffer);
        assert!(cursor.read_u32().is_err());
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.remainder(), &[1, 2, 3]);
    }

    #[test]
    fn test_cursor_skip_and_reset() {
        let buffer = [1u8, 2, 3];
        let mut cursor = Cursor::new(&buffer);
        cursor.skip(2);
        assert_eq!(cursor.remaining(), 1);
        cursor.reset();
        assert_eq!(cursor.read_u8().expect("read u8 should succeed"), 1);
    }

    #[test]
    #[should_panic(expected = "past end of input")]
    fn test_cursor_skip_past_end_panics() {
        let buffer = [0u8; 2];
        let mut cursor = Cursor::new(&buffer);
        cursor.skip(3);
    }
}
