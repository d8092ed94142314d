// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors.
//!
//! A descriptor says how to reach one member of `T` and how to validate it:
//!
//! - [`Field`]: direct member access through a getter pair.
//! - [`VirtualField`]: computed member, produced by a getter and stored back
//!   through a setter.
//!
//! Both may carry a fallback (presence compression), an invariant predicate
//! and, for direct fields, a synchronization action that runs after the value
//! was stored. Descriptors are plain values built from function pointers, so
//! constructing them per traversal costs nothing beyond the fallback value.

use super::load::Load;
use super::save::Save;
use crate::error::{Error, ErrorCode, Result};

/// Result of a setter, sync action or object callback.
///
/// `()` always succeeds, `false` fails with the hook's generic code, and an
/// `Err` is surfaced unchanged.
pub trait SetterOutcome {
    fn into_result(self, code: ErrorCode, context: &str) -> Result<()>;
}

impl SetterOutcome for () {
    fn into_result(self, _code: ErrorCode, _context: &str) -> Result<()> {
        Ok(())
    }
}

impl SetterOutcome for bool {
    fn into_result(self, code: ErrorCode, context: &str) -> Result<()> {
        if self {
            Ok(())
        } else {
            Err(Error::with_context(code, context))
        }
    }
}

impl SetterOutcome for Result<()> {
    fn into_result(self, _code: ErrorCode, _context: &str) -> Result<()> {
        self
    }
}

/// Default value of a field, compared by equality and restored on absence.
pub struct Fallback<F> {
    value: F,
    eq: fn(&F, &F) -> bool,
    reset: fn(&F) -> F,
}

impl<F> Fallback<F> {
    pub fn new(value: F) -> Self
    where
        F: PartialEq + Clone,
    {
        Self {
            value,
            eq: <F as PartialEq>::eq,
            reset: <F as Clone>::clone,
        }
    }

    pub fn value(&self) -> &F {
        &self.value
    }

    /// Whether `current` differs from the fallback and must be encoded.
    pub fn is_present(&self, current: &F) -> bool {
        !(self.eq)(current, &self.value)
    }

    /// Fresh copy of the fallback value.
    pub fn reset_value(&self) -> F {
        (self.reset)(&self.value)
    }
}

/// Direct member of `T` with type `F`; `R` is the sync action's outcome.
pub struct Field<T, F, R = ()> {
    pub(crate) name: &'static str,
    pub(crate) get: fn(&T) -> &F,
    pub(crate) get_mut: fn(&mut T) -> &mut F,
    pub(crate) fallback: Option<Fallback<F>>,
    pub(crate) invariant: Option<fn(&F) -> bool>,
    pub(crate) sync: Option<fn(&mut T) -> R>,
}

impl<T, F> Field<T, F> {
    pub fn new(name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self {
            name,
            get,
            get_mut,
            fallback: None,
            invariant: None,
            sync: None,
        }
    }
}

impl<T, F, R> Field<T, F, R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Omit the value on the wire whenever it equals `value`.
    pub fn with_fallback(mut self, value: F) -> Self
    where
        F: PartialEq + Clone,
    {
        self.fallback = Some(Fallback::new(value));
        self
    }

    /// Reject decoded values for which `check` returns false.
    pub fn with_invariant(mut self, check: fn(&F) -> bool) -> Self {
        self.invariant = Some(check);
        self
    }

    /// Run `action` on the whole object once the field was stored.
    pub fn with_sync<R2: SetterOutcome>(self, action: fn(&mut T) -> R2) -> Field<T, F, R2> {
        Field {
            name: self.name,
            get: self.get,
            get_mut: self.get_mut,
            fallback: self.fallback,
            invariant: self.invariant,
            sync: Some(action),
        }
    }
}

/// Computed member of `T`, read through `get` and stored through `set`.
pub struct VirtualField<T, F, R = ()> {
    pub(crate) name: &'static str,
    pub(crate) get: fn(&T) -> F,
    pub(crate) set: fn(&mut T, F) -> R,
    pub(crate) fallback: Option<Fallback<F>>,
    pub(crate) invariant: Option<fn(&F) -> bool>,
}

impl<T, F, R: SetterOutcome> VirtualField<T, F, R> {
    pub fn new(name: &'static str, get: fn(&T) -> F, set: fn(&mut T, F) -> R) -> Self {
        Self {
            name,
            get,
            set,
            fallback: None,
            invariant: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn with_fallback(mut self, value: F) -> Self
    where
        F: PartialEq + Clone,
    {
        self.fallback = Some(Fallback::new(value));
        self
    }

    pub fn with_invariant(mut self, check: fn(&F) -> bool) -> Self {
        self.invariant = Some(check);
        self
    }
}

/// Receives the field descriptors of an object in declaration order.
pub trait FieldVisitor<T> {
    fn field<F, R>(&mut self, field: Field<T, F, R>) -> Result<()>
    where
        F: Save + Load + Default,
        R: SetterOutcome;

    fn virtual_field<F, R>(&mut self, field: VirtualField<T, F, R>) -> Result<()>
    where
        F: Save + Load + Default,
        R: SetterOutcome;
}

pub(crate) fn check_invariant<F>(check: Option<fn(&F) -> bool>, value: &F, name: &str) -> Result<()> {
    match check {
        Some(check) if !check(value) => {
            log::debug!("[binspect] invariant check failed for field {name}");
            Err(Error::with_context(ErrorCode::FieldInvariantCheckFailed, name))
        }
        _ => Ok(()),
    }
}
