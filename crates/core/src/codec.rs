// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversion between raw stored values and property values.

use crate::dispatch;
use crate::entity::Entity;
use crate::error::RowError;
use crate::scheme::PropertyDescriptor;
use crate::store::RawRow;
use crate::value::Value;

/// Applies the input conversion of `property` to a raw stored value.
pub fn decode<E>(property: &PropertyDescriptor<E>, raw: Value) -> Value {
    match property.input_conversion() {
        Some(conversion) => conversion(raw),
        None => raw,
    }
}

/// Applies the output conversion and then the custom output method.
pub fn encode<E>(entity: &E, property: &PropertyDescriptor<E>, value: Value) -> Value {
    let value = match property.output_conversion() {
        Some(conversion) => conversion(value),
        None => value,
    };
    match property.custom_output() {
        Some(method) => method(entity, value),
        None => value,
    }
}

/// Rebuilds an entity's properties from a raw row, in scheme order.
///
/// Reconstruction is not a change: the tracker is never touched.
pub(crate) fn reconstruct<E: Entity>(entity: &mut E, row: &RawRow) -> Result<(), RowError> {
    for property in E::scheme().iter() {
        if let Some(extractor) = property.extractor() {
            extractor(entity, row)?;
            continue;
        }
        if property.is_read_only() {
            continue;
        }
        let Some(field) = property.storage_field() else {
            continue;
        };

        let value = decode(property, row.value(field));
        dispatch::write(entity, property, value)?;
    }
    Ok(())
}
