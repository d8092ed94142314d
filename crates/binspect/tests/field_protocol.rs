// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Field descriptors: fallbacks, invariants, synchronization, setters and
// object callbacks, through both derived and hand-written inspectors.

#![allow(clippy::missing_panics_doc)]

use binspect::{
    from_bytes, impl_inspect_codec, to_bytes, BinaryDeserializer, Error, ErrorCode, Field,
    FieldVisitor, Inspect, Result, VirtualField,
};

fn valid_percent(value: &u8) -> bool {
    *value <= 100
}

#[derive(Debug, Default, PartialEq, Inspect)]
#[inspect(name = "gauge", type_id = 220, on_load = Gauge::after_load)]
struct Gauge {
    #[inspect(rename = "id")]
    gauge_id: u32,
    #[inspect(fallback = 50, invariant = valid_percent, sync = Gauge::refresh_label)]
    level: u8,
    #[inspect(skip)]
    label: String,
    #[inspect(skip)]
    loads: u32,
    note: Option<String>,
}

impl Gauge {
    fn refresh_label(&mut self) {
        self.label = format!("{}%", self.level);
    }

    fn after_load(&mut self) -> bool {
        self.loads += 1;
        self.gauge_id != 0
    }
}

#[derive(Debug, Default, Inspect)]
struct Window {
    #[inspect(sync = Window::reject_zero)]
    width: u16,
}

impl Window {
    fn reject_zero(&mut self) -> bool {
        self.width != 0
    }
}

#[derive(Debug, Default, Inspect)]
#[inspect(on_save = Ticket::check)]
struct Ticket {
    seat: u16,
}

impl Ticket {
    fn check(&self) -> Result<()> {
        if self.seat == 0 {
            Err(Error::with_context(ErrorCode::RuntimeError, "seat unassigned"))
        } else {
            Ok(())
        }
    }
}

/// Stores millimetres, exposes metres on the wire.
#[derive(Debug, Default, PartialEq)]
struct Rod {
    length_mm: u32,
}

impl Rod {
    fn metres(&self) -> f64 {
        f64::from(self.length_mm) / 1000.0
    }

    fn set_metres(&mut self, value: f64) -> bool {
        if !(0.0..=4_000.0).contains(&value) {
            return false;
        }
        self.length_mm = (value * 1000.0).round() as u32;
        true
    }
}

impl Inspect for Rod {
    const NAME: &'static str = "rod";

    fn fields<V: FieldVisitor<Self>>(v: &mut V) -> Result<()> {
        v.virtual_field(VirtualField::new("length", Rod::metres, Rod::set_metres))
    }
}

impl_inspect_codec!(Rod);

/// Hand-written inspector mixing a plain field and a fallback virtual field.
#[derive(Debug, Default, PartialEq)]
struct Lamp {
    watts: u16,
    on: bool,
}

impl Inspect for Lamp {
    const NAME: &'static str = "lamp";

    fn fields<V: FieldVisitor<Self>>(v: &mut V) -> Result<()> {
        v.field(Field::<Self, u16>::new("watts", |s| &s.watts, |s| &mut s.watts))?;
        v.virtual_field(
            VirtualField::<Self, u8>::new("state", |s| u8::from(s.on), |s, x| s.on = x != 0)
                .with_fallback(0)
                .with_invariant(|x| *x <= 1),
        )
    }
}

impl_inspect_codec!(Lamp);

// ============================================================================
// Derived attributes
// ============================================================================

#[test]
fn test_fallback_compresses_default_level() {
    let gauge = Gauge {
        gauge_id: 7,
        level: 50,
        ..Gauge::default()
    };
    let bytes = to_bytes(&gauge).expect("encode should succeed");
    assert_eq!(bytes, [0x00, 0x00, 0x00, 0x07, 0x00, 0x00]);
}

#[test]
fn test_present_level_runs_sync_and_callback() {
    let decoded: Gauge = from_bytes(&[0x00, 0x00, 0x00, 0x07, 0x01, 80, 0x00])
        .expect("decode should succeed");
    assert_eq!(decoded.gauge_id, 7);
    assert_eq!(decoded.level, 80);
    assert_eq!(decoded.label, "80%");
    assert_eq!(decoded.loads, 1);
    assert_eq!(decoded.note, None);
}

#[test]
fn test_absent_level_skips_sync() {
    let mut gauge = Gauge {
        level: 99,
        label: String::from("stale"),
        ..Gauge::default()
    };
    BinaryDeserializer::new(&[0x00, 0x00, 0x00, 0x09, 0x00, 0x01, 0x01, b'x'])
        .apply(&mut gauge)
        .expect("decode should succeed");
    assert_eq!(gauge.level, 50);
    assert_eq!(gauge.label, "stale");
    assert_eq!(gauge.note.as_deref(), Some("x"));
}

#[test]
fn test_invariant_rejects_before_assignment() {
    let mut gauge = Gauge {
        level: 42,
        ..Gauge::default()
    };
    let err = BinaryDeserializer::new(&[0x00, 0x00, 0x00, 0x07, 0x01, 101, 0x00])
        .apply(&mut gauge)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::FieldInvariantCheckFailed);
    assert_eq!(err.context(), Some("level"));
    assert_eq!(gauge.level, 42);
    assert!(gauge.label.is_empty());
}

#[test]
fn test_load_callback_failure() {
    let err = from_bytes::<Gauge>(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::LoadCallbackFailed);
    assert_eq!(err.context(), Some("gauge"));
}

#[test]
fn test_derived_names_and_type_id() {
    assert_eq!(<Gauge as Inspect>::NAME, "gauge");
    assert_eq!(<Gauge as Inspect>::TYPE_ID, 220);
    assert_eq!(<Gauge as binspect::HasTypeId>::TYPE_ID, 220);
    assert_eq!(<Window as Inspect>::NAME, "Window");
}

#[test]
fn test_sync_failure() {
    let err = from_bytes::<Window>(&[0x00, 0x00]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::FieldValueSynchronizationFailed);
    assert_eq!(err.context(), Some("width"));

    let window: Window = from_bytes(&[0x01, 0x00]).expect("decode should succeed");
    assert_eq!(window.width, 256);
}

#[test]
fn test_save_callback_error_surfaces_unchanged() {
    let err = to_bytes(&Ticket { seat: 0 }).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RuntimeError);
    assert_eq!(err.context(), Some("seat unassigned"));

    let bytes = to_bytes(&Ticket { seat: 3 }).expect("encode should succeed");
    assert_eq!(bytes, [0x00, 0x03]);
}

// ============================================================================
// Virtual fields
// ============================================================================

#[test]
fn test_virtual_field_roundtrip() {
    let rod = Rod { length_mm: 1250 };
    let bytes = to_bytes(&rod).expect("encode should succeed");
    assert_eq!(bytes, 1.25f64.to_bits().to_be_bytes());
    let decoded: Rod = from_bytes(&bytes).expect("decode should succeed");
    assert_eq!(decoded, rod);
}

#[test]
fn test_virtual_setter_rejection() {
    let bytes = to_bytes(&9_000.0f64).expect("encode should succeed");
    let err = from_bytes::<Rod>(&bytes).unwrap_err();
    assert_eq!(err.code(), ErrorCode::FieldValueSynchronizationFailed);
    assert_eq!(err.context(), Some("length"));
}

#[test]
fn test_virtual_field_with_fallback() {
    let off = Lamp { watts: 60, on: false };
    let bytes = to_bytes(&off).expect("encode should succeed");
    assert_eq!(bytes, [0x00, 0x3C, 0x00]);

    let on: Lamp = from_bytes(&[0x00, 0x3C, 0x01, 0x01]).expect("decode should succeed");
    assert_eq!(on, Lamp { watts: 60, on: true });

    let err = from_bytes::<Lamp>(&[0x00, 0x3C, 0x01, 0x02]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::FieldInvariantCheckFailed);
    assert_eq!(err.context(), Some("state"));
}
