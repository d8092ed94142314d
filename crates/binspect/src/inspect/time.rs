// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Durations and timestamps.
//!
//! Binary formats carry the signed 64-bit nanosecond count (timestamps relative
//! to the UNIX epoch). Human-readable formats get a text rendering instead,
//! which cannot be loaded back.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::category::{Categorized, Category};
use super::load::Load;
use super::save::Save;
use super::traits::{Deserializer, Serializer};
use crate::error::{Error, ErrorCode, Result};

fn duration_nanos(value: Duration) -> Result<i64> {
    i64::try_from(value.as_nanos())
        .map_err(|_| Error::invalid_argument("duration exceeds 64-bit nanoseconds"))
}

fn since_epoch_nanos(value: SystemTime) -> Result<i64> {
    match value.duration_since(UNIX_EPOCH) {
        Ok(after) => duration_nanos(after),
        Err(before) => duration_nanos(before.duration()).map(i64::wrapping_neg),
    }
}

fn text_unsupported(what: &str) -> Error {
    Error::with_context(
        ErrorCode::UnsupportedOperation,
        format!("loading {what} from text"),
    )
}

impl Categorized for Duration {
    const CATEGORY: Category = Category::CustomHook;
}

impl Save for Duration {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        if f.has_human_readable_format() {
            return f.value_str(&format!("{self:?}"));
        }
        f.value_i64(duration_nanos(*self)?)
    }
}

impl Load for Duration {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        if f.has_human_readable_format() {
            return Err(text_unsupported("duration"));
        }
        let nanos = f.value_i64()?;
        let nanos = u64::try_from(nanos)
            .map_err(|_| Error::invalid_argument(format!("negative duration {nanos}ns")))?;
        *self = Duration::from_nanos(nanos);
        Ok(())
    }
}

impl Categorized for SystemTime {
    const CATEGORY: Category = Category::CustomHook;
}

impl Save for SystemTime {
    fn save<S: Serializer + ?Sized>(&self, f: &mut S) -> Result<()> {
        let nanos = since_epoch_nanos(*self)?;
        if f.has_human_readable_format() {
            return f.value_str(&format!("{nanos}ns since epoch"));
        }
        f.value_i64(nanos)
    }
}

impl Load for SystemTime {
    fn load<D: Deserializer + ?Sized>(&mut self, f: &mut D) -> Result<()> {
        if f.has_human_readable_format() {
            return Err(text_unsupported("timestamp"));
        }
        let nanos = f.value_i64()?;
        let offset = Duration::from_nanos(nanos.unsigned_abs());
        let value = if nanos >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        *self = value.ok_or_else(|| {
            Error::invalid_argument(format!("timestamp {nanos}ns out of range"))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_bytes, to_bytes, BinaryDeserializer};

    #[test]
    fn test_duration_as_nanoseconds() {
        let value = Duration::from_millis(1500);
        let bytes = to_bytes(&value).expect("encode should succeed");
        assert_eq!(bytes, 1_500_000_000i64.to_be_bytes());
        assert_eq!(
            from_bytes::<Duration>(&bytes).expect("decode should succeed"),
            value
        );
    }

    #[test]
    fn test_duration_out_of_range() {
        let err = to_bytes(&Duration::MAX).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = from_bytes::<Duration>(&(-1i64).to_be_bytes()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_system_time_before_and_after_epoch() {
        for value in [
            UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            UNIX_EPOCH - Duration::from_nanos(42),
        ] {
            let bytes = to_bytes(&value).expect("encode should succeed");
            let mut decoded = UNIX_EPOCH;
            BinaryDeserializer::new(&bytes)
                .apply(&mut decoded)
                .expect("decode should succeed");
            assert_eq!(decoded, value);
        }

        let bytes = to_bytes(&(UNIX_EPOCH - Duration::from_nanos(42))).expect("encode should succeed");
        assert_eq!(bytes, (-42i64).to_be_bytes());
    }
}
