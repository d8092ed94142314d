// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plain objects and the field protocol.
//!
//! An [`Inspect`] type lists its fields once, in declaration order, through
//! [`Inspect::fields`]. [`FieldSaver`] and [`FieldLoader`] walk that list
//! against a format, each field inside one `begin_*`/`end_field` bracket.
//!
//! Decoding a field runs `tag -> payload -> invariant -> store -> sync`; an
//! absent field with a fallback runs `tag -> fallback` instead. The payload is
//! decoded into a temporary, so a field is never left half-written by a
//! failed decode.

use super::dispatch::ensure_supported;
use super::field::{check_invariant, Field, FieldVisitor, SetterOutcome, VirtualField};
use super::load::Load;
use super::save::Save;
use super::traits::{Deserializer, Serializer};
use crate::config::INVALID_TYPE_ID;
use crate::error::{ErrorCode, Result};
use crate::type_id::TypeId;

/// Aggregate with named fields.
///
/// Usually derived with `#[derive(Inspect)]`; hand-written impls pair with
/// [`impl_inspect_codec!`](crate::impl_inspect_codec).
pub trait Inspect: Sized {
    const NAME: &'static str;
    const TYPE_ID: TypeId = INVALID_TYPE_ID;

    fn fields<V: FieldVisitor<Self>>(visitor: &mut V) -> Result<()>;

    /// Runs after all fields were encoded.
    fn on_save(&self) -> Result<()> {
        Ok(())
    }

    /// Runs after all fields were decoded.
    fn on_load(&mut self) -> Result<()> {
        Ok(())
    }
}

pub struct FieldSaver<'a, T, S: ?Sized> {
    obj: &'a T,
    f: &'a mut S,
}

impl<'a, T, S: Serializer + ?Sized> FieldSaver<'a, T, S> {
    pub fn new(obj: &'a T, f: &'a mut S) -> Self {
        Self { obj, f }
    }

    fn save_with_fallback<F: Save>(
        &mut self,
        name: &str,
        value: &F,
        fallback: Option<&super::field::Fallback<F>>,
    ) -> Result<()> {
        ensure_supported::<F>()?;
        match fallback {
            Some(fallback) => {
                let present = fallback.is_present(value);
                F::save_optional_field(present.then_some(value), self.f, name)?;
            }
            None => value.save_field(self.f, name)?,
        }
        self.f.end_field()
    }
}

impl<T, S: Serializer + ?Sized> FieldVisitor<T> for FieldSaver<'_, T, S> {
    fn field<F, R>(&mut self, field: Field<T, F, R>) -> Result<()>
    where
        F: Save + Load + Default,
        R: SetterOutcome,
    {
        let value = (field.get)(self.obj);
        self.save_with_fallback(field.name, value, field.fallback.as_ref())
    }

    fn virtual_field<F, R>(&mut self, field: VirtualField<T, F, R>) -> Result<()>
    where
        F: Save + Load + Default,
        R: SetterOutcome,
    {
        let value = (field.get)(self.obj);
        self.save_with_fallback(field.name, &value, field.fallback.as_ref())
    }
}

pub struct FieldLoader<'a, T, D: ?Sized> {
    obj: &'a mut T,
    f: &'a mut D,
}

impl<'a, T, D: Deserializer + ?Sized> FieldLoader<'a, T, D> {
    pub fn new(obj: &'a mut T, f: &'a mut D) -> Self {
        Self { obj, f }
    }

    /// Decode the payload; `None` means absent and the fallback applies.
    fn load_payload<F: Load + Default>(&mut self, name: &str, optional: bool) -> Result<Option<F>> {
        ensure_supported::<F>()?;
        if optional {
            let mut slot = None;
            F::load_optional_field(&mut slot, self.f, name)?;
            Ok(slot)
        } else {
            let mut value = F::default();
            value.load_field(self.f, name)?;
            Ok(Some(value))
        }
    }
}

impl<T, D: Deserializer + ?Sized> FieldVisitor<T> for FieldLoader<'_, T, D> {
    fn field<F, R>(&mut self, field: Field<T, F, R>) -> Result<()>
    where
        F: Save + Load + Default,
        R: SetterOutcome,
    {
        let name = field.name;
        match self.load_payload::<F>(name, field.fallback.is_some())? {
            Some(value) => {
                check_invariant(field.invariant, &value, name)?;
                *(field.get_mut)(self.obj) = value;
                if let Some(sync) = field.sync {
                    sync(self.obj)
                        .into_result(ErrorCode::FieldValueSynchronizationFailed, name)
                        .inspect_err(|err| {
                            log::debug!("[binspect] sync of field {name} failed: {err}");
                        })?;
                }
            }
            None => {
                if let Some(fallback) = &field.fallback {
                    *(field.get_mut)(self.obj) = fallback.reset_value();
                }
            }
        }
        self.f.end_field()
    }

    fn virtual_field<F, R>(&mut self, field: VirtualField<T, F, R>) -> Result<()>
    where
        F: Save + Load + Default,
        R: SetterOutcome,
    {
        let name = field.name;
        let value = match self.load_payload::<F>(name, field.fallback.is_some())? {
            Some(value) => {
                check_invariant(field.invariant, &value, name)?;
                value
            }
            None => match &field.fallback {
                Some(fallback) => fallback.reset_value(),
                None => return self.f.end_field(),
            },
        };
        (field.set)(self.obj, value)
            .into_result(ErrorCode::FieldValueSynchronizationFailed, name)
            .inspect_err(|err| {
                log::debug!("[binspect] setter of field {name} failed: {err}");
            })?;
        self.f.end_field()
    }
}

/// Encode `obj` as an object scope: fields, then `on_save`.
pub fn save_object<T, S>(obj: &T, f: &mut S) -> Result<()>
where
    T: Inspect,
    S: Serializer + ?Sized,
{
    f.begin_object(T::TYPE_ID, T::NAME)?;
    T::fields(&mut FieldSaver::new(obj, &mut *f))?;
    obj.on_save().inspect_err(|err| {
        log::debug!("[binspect] save callback of {} failed: {err}", T::NAME);
    })?;
    f.end_object()
}

/// Decode an object scope into `obj`: fields, then `on_load`.
pub fn load_object<T, D>(obj: &mut T, f: &mut D) -> Result<()>
where
    T: Inspect,
    D: Deserializer + ?Sized,
{
    f.begin_object(T::TYPE_ID, T::NAME)?;
    T::fields(&mut FieldLoader::new(&mut *obj, &mut *f))?;
    obj.on_load().inspect_err(|err| {
        log::debug!("[binspect] load callback of {} failed: {err}", T::NAME);
    })?;
    f.end_object()
}

/// Implement `Categorized`, `Save` and `Load` for hand-written [`Inspect`]
/// types.
#[macro_export]
macro_rules! impl_inspect_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Categorized for $ty {
                const CATEGORY: $crate::Category = $crate::Category::PlainObject;
            }

            impl $crate::Save for $ty {
                fn save<S: $crate::Serializer + ?Sized>(&self, f: &mut S) -> $crate::Result<()> {
                    $crate::inspect::object::save_object(self, f)
                }
            }

            impl $crate::Load for $ty {
                fn load<D: $crate::Deserializer + ?Sized>(&mut self, f: &mut D) -> $crate::Result<()> {
                    $crate::inspect::object::load_object(self, f)
                }
            }
        )+
    };
}
