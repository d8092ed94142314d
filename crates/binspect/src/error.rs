// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error kinds reported by encode/decode sessions.
//!
//! A session surfaces exactly one error: traversal steps return `Result`, and
//! the first `Err` short-circuits every enclosing scope, so an error that was
//! reported first can never be replaced by a later one.

use std::fmt;

/// Flat enumeration of the failure kinds a session can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Read past the end of the input buffer.
    EndOfStream,
    /// Malformed input (unparsable long-double text, invalid UTF-8, bad length).
    InvalidArgument,
    /// Variant/tuple type tag out of bounds or unknown to the variant.
    InvalidFieldType,
    /// Attempted to traverse a type without a wire representation.
    UnsafeType,
    /// A decoded field value failed its invariant predicate.
    FieldInvariantCheckFailed,
    /// A post-decode synchronization action (or setter) reported failure.
    FieldValueSynchronizationFailed,
    /// The active format does not provide the requested capability.
    UnsupportedOperation,
    /// Catch-all for setter and container failures (e.g. duplicate keys).
    RuntimeError,
    /// An object's save callback reported failure.
    SaveCallbackFailed,
    /// An object's load callback reported failure.
    LoadCallbackFailed,
    /// Input nests scopes deeper than the configured limit.
    DepthLimitExceeded,
}

impl ErrorCode {
    /// Stable snake_case name of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EndOfStream => "end_of_stream",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::InvalidFieldType => "invalid_field_type",
            ErrorCode::UnsafeType => "unsafe_type",
            ErrorCode::FieldInvariantCheckFailed => "field_invariant_check_failed",
            ErrorCode::FieldValueSynchronizationFailed => "field_value_synchronization_failed",
            ErrorCode::UnsupportedOperation => "unsupported_operation",
            ErrorCode::RuntimeError => "runtime_error",
            ErrorCode::SaveCallbackFailed => "save_callback_failed",
            ErrorCode::LoadCallbackFailed => "load_callback_failed",
            ErrorCode::DepthLimitExceeded => "depth_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced by a failed encode or decode session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    context: Option<String>,
}

impl Error {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            context: None,
        }
    }

    /// Error with a short context string (field name or reason).
    pub fn with_context(code: ErrorCode, context: impl Into<String>) -> Self {
        Self {
            code,
            context: Some(context.into()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub(crate) fn end_of_stream(offset: usize, wanted: usize) -> Self {
        log::debug!("[binspect] end of stream at offset {offset}, {wanted} more bytes wanted");
        Self::with_context(
            ErrorCode::EndOfStream,
            format!("read of {wanted} bytes at offset {offset}"),
        )
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::with_context(ErrorCode::InvalidArgument, reason)
    }

    pub(crate) fn unsafe_type(type_name: &str) -> Self {
        log::debug!("[binspect] refusing to traverse unsafe type {type_name}");
        Self::with_context(ErrorCode::UnsafeType, type_name)
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}: {}", self.code, context),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
