// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for binary deserialization
//!
//! Feeds arbitrary bytes to the wire layers and to `Load` implementations of
//! builtins, containers and derived types. None of these should panic, and
//! declared lengths must never drive allocation past the input size.

#![no_main]

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use binspect::core::ser::{varint, Cursor};
use binspect::{
    from_bytes, from_bytes_with, DecodeConfig, Inspect, LongDouble, U16String, U32String, Variant,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, PartialEq, Variant)]
enum Value {
    Int(i64),
    Text(String),
    Flags(BTreeSet<String>),
}

#[derive(Debug, Default, Inspect)]
struct Record {
    id: u32,
    #[inspect(fallback = 7, invariant = |v| *v < 1000)]
    weight: u16,
    name: String,
    value: Value,
    previous: Option<Value>,
    flags: Vec<bool>,
    blob: Vec<u8>,
    attrs: BTreeMap<String, (i8, f32)>,
    children: Vec<Record>,
}

fuzz_target!(|data: &[u8]| {
    // ----------------------------------------------------------------
    // 1. Low-level cursor and varint reads
    // ----------------------------------------------------------------
    {
        let mut cursor = Cursor::new(data);
        let _ = cursor.read_u8();
        let _ = cursor.read_u16();
        let _ = cursor.read_u32();
        let _ = cursor.read_u64();
        let _ = cursor.read_f64();
        let _ = cursor.read_bytes(4);
    }
    {
        let mut cursor = Cursor::new(data);
        while !cursor.is_eof() {
            if varint::read_u32(&mut cursor).is_err() {
                break;
            }
        }
    }

    // ----------------------------------------------------------------
    // 2. Builtin leaves
    // ----------------------------------------------------------------
    let _ = from_bytes::<bool>(data);
    let _ = from_bytes::<i8>(data);
    let _ = from_bytes::<u16>(data);
    let _ = from_bytes::<i32>(data);
    let _ = from_bytes::<u64>(data);
    let _ = from_bytes::<f32>(data);
    let _ = from_bytes::<f64>(data);
    let _ = from_bytes::<char>(data);
    let _ = from_bytes::<LongDouble>(data);
    let _ = from_bytes::<String>(data);
    let _ = from_bytes::<U16String>(data);
    let _ = from_bytes::<U32String>(data);
    let _ = from_bytes::<std::time::Duration>(data);
    let _ = from_bytes::<std::time::SystemTime>(data);

    // ----------------------------------------------------------------
    // 3. Containers
    // ----------------------------------------------------------------
    let _ = from_bytes::<Vec<u8>>(data);
    let _ = from_bytes::<Vec<bool>>(data);
    let _ = from_bytes::<Vec<u32>>(data);
    let _ = from_bytes::<VecDeque<String>>(data);
    let _ = from_bytes::<BTreeSet<i16>>(data);
    let _ = from_bytes::<BTreeMap<String, Vec<u8>>>(data);
    let _ = from_bytes::<Option<String>>(data);
    let _ = from_bytes::<(u8, String, [u16; 3])>(data);

    // ----------------------------------------------------------------
    // 4. Derived objects and variants, with tight limits as well
    // ----------------------------------------------------------------
    let _ = from_bytes::<Value>(data);
    let _ = from_bytes::<Record>(data);
    let tight = DecodeConfig::default()
        .with_max_depth(16)
        .with_max_sequence_len(64);
    let _ = from_bytes_with::<Record>(data, tight);
});
