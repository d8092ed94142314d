// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boolean-sequence bit packing.
//!
//! Eight booleans per byte, most significant bit first, in sequence order.
//! The unused low bits of a trailing partial byte are zero on encode and
//! ignored on decode.

use crate::config::BOOLS_PER_BYTE;

/// Bytes needed to pack `count` booleans.
pub fn packed_len(count: usize) -> usize {
    count.div_ceil(BOOLS_PER_BYTE)
}

pub fn pack(values: &[bool]) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed_len(values.len()));
    for chunk in values.chunks(BOOLS_PER_BYTE) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            if bit {
                byte |= 0x80 >> i;
            }
        }
        out.push(byte);
    }
    out
}

/// Unpack `count` booleans from `bytes`, which holds at least
/// `packed_len(count)` bytes.
pub fn unpack(bytes: &[u8], count: usize, out: &mut Vec<bool>) {
    out.reserve(count);
    for i in 0..count {
        let byte = bytes[i / BOOLS_PER_BYTE];
        out.push(byte & (0x80 >> (i % BOOLS_PER_BYTE)) != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_msb_first() {
        assert_eq!(pack(&[true]), [0x80]);
        assert_eq!(pack(&[false, true]), [0x40]);
        assert_eq!(
            pack(&[true, false, true, false, false, false, false, true, true]),
            [0xA1, 0x80]
        );
        assert!(pack(&[]).is_empty());
    }

    #[test]
    fn test_unpack_ignores_padding_bits() {
        let mut out = Vec::new();
        unpack(&[0xFF], 3, &mut out);
        assert_eq!(out, [true, true, true]);
    }

    #[test]
    fn test_pack_unpack_sizes() {
        for count in [0usize, 1, 7, 8, 9, 15] {
            let values: Vec<bool> = (0..count).map(|i| i % 3 == 0).collect();
            let packed = pack(&values);
            assert_eq!(packed.len(), packed_len(count));
            let mut out = Vec::new();
            unpack(&packed, count, &mut out);
            assert_eq!(out, values);
        }
    }
}
