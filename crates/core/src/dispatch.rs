// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Single dispatch point for external property access.
//!
//! Every read and write from outside the engine resolves here: either to a
//! custom getter/setter declared in the scheme, or to the property's slot.
//! Writes are recorded in the change tracker; reads never are.

use tracing::trace;

use crate::entity::Entity;
use crate::error::RowError;
use crate::scheme::PropertyDescriptor;
use crate::value::Value;

fn descriptor<E: Entity>(name: &str) -> Result<&'static PropertyDescriptor<E>, RowError> {
    E::scheme()
        .get(name)
        .ok_or_else(|| RowError::PropertyNotFound {
            table: E::TABLE,
            property: name.to_string(),
        })
}

/// Reads the current value of a property.
///
/// No output conversion is applied; conversions only happen at the storage
/// boundary.
pub(crate) fn get<E: Entity>(entity: &E, name: &str) -> Result<Value, RowError> {
    let property = descriptor::<E>(name)?;
    Ok(read(entity, property))
}

pub(crate) fn read<E: Entity>(entity: &E, property: &PropertyDescriptor<E>) -> Value {
    if let Some(getter) = property.custom_getter() {
        return getter(entity);
    }
    property
        .storage_slot()
        .map_or(Value::Null, |slot| slot.read(entity))
}

/// Writes `value` into an entity without touching the change tracker.
pub(crate) fn write<E: Entity>(
    entity: &mut E,
    property: &PropertyDescriptor<E>,
    value: Value,
) -> Result<(), RowError> {
    if let Some(setter) = property.custom_setter() {
        return setter(entity, value);
    }
    match property.storage_slot() {
        Some(slot) => slot.write(entity, value),
        None => {
            trace!(
                table = E::TABLE,
                property = property.name(),
                "Property has no setter or slot, value dropped"
            );
            Ok(())
        }
    }
}

/// Writes a property and records it as changed.
pub(crate) fn set<E: Entity>(entity: &mut E, name: &str, value: Value) -> Result<(), RowError> {
    let property = descriptor::<E>(name)?;
    if property.is_read_only() {
        return Err(RowError::PropertyReadOnly {
            table: E::TABLE,
            property: property.name(),
        });
    }
    if entity.row_state().tracker().is_adjusted(property.name()) {
        return Err(RowError::PropertyLocked {
            table: E::TABLE,
            property: property.name(),
        });
    }

    write(entity, property, value)?;
    entity
        .row_state_mut()
        .tracker_mut()
        .mark_changed(property.name());
    Ok(())
}

/// Accumulates a delta for a numeric property.
pub(crate) fn adjust<E: Entity>(entity: &mut E, name: &str, delta: Value) -> Result<(), RowError> {
    let property = descriptor::<E>(name)?;
    let not_adjustable = |reason| RowError::PropertyNotAdjustable {
        table: E::TABLE,
        property: property.name(),
        reason,
    };

    if property.is_read_only() {
        return Err(RowError::PropertyReadOnly {
            table: E::TABLE,
            property: property.name(),
        });
    }
    if property.storage_field().is_none() {
        return Err(not_adjustable("property has no storage field"));
    }
    if !property.is_numeric() {
        return Err(not_adjustable("property is not numeric"));
    }
    if !delta.is_numeric() {
        return Err(not_adjustable("delta is not numeric"));
    }
    if entity.row_state().tracker().is_changed(property.name()) {
        return Err(RowError::PropertyLocked {
            table: E::TABLE,
            property: property.name(),
        });
    }

    entity
        .row_state_mut()
        .tracker_mut()
        .accumulate(property.name(), &delta)
        .ok_or_else(|| not_adjustable("pending delta overflows"))?;
    Ok(())
}
