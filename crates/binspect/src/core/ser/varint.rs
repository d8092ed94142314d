// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sequence-length varint.
//!
//! Little-endian base-128 groups: the low 7 bits of each byte carry payload,
//! the high bit announces another byte. Lengths are 32-bit on the wire
//! regardless of the host pointer width, so a valid varint never exceeds
//! [`VARINT_MAX_BYTES`] bytes.

use super::cursor::{Cursor, Sink};
use crate::config::{VARINT_CONTINUATION, VARINT_GROUP_BITS, VARINT_MAX_BYTES};
use crate::error::{Error, Result};

/// Number of bytes `value` occupies as a varint.
pub fn encoded_len(value: u32) -> usize {
    let mut x = value;
    let mut len = 1;
    while x > 0x7f {
        x >>= VARINT_GROUP_BITS;
        len += 1;
    }
    len
}

/// Write a sequence length; lengths beyond 32 bits are rejected.
pub fn write_len(sink: &mut Sink<'_>, len: usize) -> Result<()> {
    let value = u32::try_from(len)
        .map_err(|_| Error::invalid_argument(format!("sequence length {len} exceeds 32 bits")))?;
    write_u32(sink, value);
    Ok(())
}

pub fn write_u32(sink: &mut Sink<'_>, value: u32) {
    let mut buf = [0u8; VARINT_MAX_BYTES];
    let mut i = 0;
    let mut x = value;
    while x > 0x7f {
        buf[i] = (x as u8 & 0x7f) | VARINT_CONTINUATION;
        x >>= VARINT_GROUP_BITS;
        i += 1;
    }
    buf[i] = x as u8 & 0x7f;
    sink.write_bytes(&buf[..=i]);
}

/// Read a sequence length.
///
/// Truncated input fails with `EndOfStream`; more than five groups or a
/// payload wider than 32 bits fails with `InvalidArgument`.
pub fn read_u32(cursor: &mut Cursor<'_>) -> Result<u32> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for _ in 0..VARINT_MAX_BYTES {
        let byte = cursor.read_u8()?;
        value |= u64::from(byte & 0x7f) << shift;
        shift += VARINT_GROUP_BITS;
        if byte & VARINT_CONTINUATION == 0 {
            return u32::try_from(value).map_err(|_| {
                log::debug!("[binspect] varint payload {value} exceeds 32 bits");
                Error::invalid_argument("varint exceeds 32 bits")
            });
        }
    }
    log::debug!(
        "[binspect] varint longer than {VARINT_MAX_BYTES} bytes at offset {}",
        cursor.offset()
    );
    Err(Error::invalid_argument("varint too long"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn encode(value: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_u32(&mut Sink::new(&mut buf), value);
        buf
    }

    #[test]
    fn test_varint_boundaries() {
        let cases: [(u32, &[u8]); 6] = [
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (16383, &[0xff, 0x7f]),
            (16384, &[0x80, 0x80, 0x01]),
            (0x7fff_ffff, &[0xff, 0xff, 0xff, 0xff, 0x07]),
        ];
        for (value, expected) in cases {
            let bytes = encode(value);
            assert_eq!(bytes, expected, "encoding of {value}");
            assert_eq!(encoded_len(value), expected.len());
            let mut cursor = Cursor::new(&bytes);
            assert_eq!(
                read_u32(&mut cursor).expect("varint decode should succeed"),
                value
            );
            assert!(cursor.is_eof());
        }
    }

    #[test]
    fn test_varint_u32_max() {
        let bytes = encode(u32::MAX);
        assert_eq!(bytes, [0xff, 0xff, 0xff, 0xff, 0x0f]);
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(
            read_u32(&mut cursor).expect("varint decode should succeed"),
            u32::MAX
        );
    }

    #[test]
    fn test_varint_truncated() {
        let mut cursor = Cursor::new(&[0x80, 0x80]);
        let err = read_u32(&mut cursor).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EndOfStream);
    }

    #[test]
    fn test_varint_too_long() {
        let mut cursor = Cursor::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        let err = read_u32(&mut cursor).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let mut cursor = Cursor::new(&[0xff, 0xff, 0xff, 0xff, 0x1f]);
        let err = read_u32(&mut cursor).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_write_len_rejects_wide_lengths() {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        write_len(&mut sink, 300).expect("write_len should succeed");
        assert_eq!(sink.buf(), &[0xac, 0x02]);

        #[cfg(target_pointer_width = "64")]
        {
            let err = write_len(&mut sink, u32::MAX as usize + 1).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidArgument);
        }
    }
}
