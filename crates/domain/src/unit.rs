// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inventory units: one row of the `units` table.

use std::sync::LazyLock;

use dbrow::{Entity, PropertyDescriptor, PropertyScheme, RawRow, RowError, RowState, Value};
use time::{Date, OffsetDateTime};

use crate::error::rejected;
use crate::types::{Location, UnitKind, format_date, parse_date, timestamp_from_unix};

/// A quantity of one kind of item stored at one location.
///
/// A unit is empty, and is deleted on save, once its quantity drops to zero.
/// Stock movements should go through `adjust("quantity", delta)` so they
/// combine with concurrent movements at the database.
#[derive(Debug, Default)]
pub struct Unit {
    row: RowState,
    fleet_id: i64,
    name: String,
    kind: UnitKind,
    quantity: i64,
    weight_kg: Option<f64>,
    location: Location,
    serviced_on: Option<Date>,
    created_at: Option<OffsetDateTime>,
}

type UnitProperty = PropertyDescriptor<Unit>;

#[allow(clippy::cast_precision_loss)]
fn grams_to_kilograms(raw: Value) -> Value {
    match raw {
        Value::Int(grams) => Value::Float(grams as f64 / 1000.0),
        other => other,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn kilograms_to_grams(value: Value) -> Value {
    match value {
        Value::Float(kg) if kg.is_finite() => Value::Int((kg * 1000.0).round() as i64),
        Value::Int(kg) => kg.checked_mul(1000).map_or(Value::Null, Value::Int),
        other => other,
    }
}

fn trim_name(_unit: &Unit, value: Value) -> Value {
    match value {
        Value::Text(name) => Value::Text(name.trim().to_string()),
        other => other,
    }
}

fn extract_location(unit: &mut Unit, row: &RawRow) -> Result<(), RowError> {
    let sector: i64 = row.value("location_sector").decode("location")?;
    let slot: i64 = row.value("location_slot").decode("location")?;
    unit.location = Location::new(sector, slot)
        .map_err(|e| rejected("location", "sector:slot", &Value::Int(sector), &e))?;
    Ok(())
}

fn extract_created_at(unit: &mut Unit, row: &RawRow) -> Result<(), RowError> {
    let seconds: Option<i64> = row.value("created_at").decode("created_at")?;
    unit.created_at = seconds
        .map(|s| {
            timestamp_from_unix(s)
                .map_err(|e| rejected("created_at", "unix seconds", &Value::Int(s), &e))
        })
        .transpose()?;
    Ok(())
}

static UNIT_SCHEME: LazyLock<PropertyScheme<Unit>> = LazyLock::new(|| {
    PropertyScheme::new(vec![
        UnitProperty::new("fleet").field("fleet_id").slot(
            |unit| unit.fleet_id.into(),
            |unit, value| {
                unit.fleet_id = value.decode("fleet")?;
                Ok(())
            },
        ),
        UnitProperty::new("name")
            .field("name")
            .output_method(trim_name)
            .slot(
                |unit| unit.name.clone().into(),
                |unit, value| {
                    unit.name = value.decode::<Option<String>>("name")?.unwrap_or_default();
                    Ok(())
                },
            ),
        UnitProperty::new("kind").field("kind").slot(
            |unit| unit.kind.code().into(),
            |unit, value| {
                unit.kind = match &value {
                    Value::Text(name) => name.parse(),
                    _ => UnitKind::from_code(value.clone().decode("kind")?),
                }
                .map_err(|e| rejected("kind", "unit kind", &value, &e))?;
                Ok(())
            },
        ),
        UnitProperty::new("quantity")
            .field("quantity")
            .numeric()
            .slot(
                |unit| unit.quantity.into(),
                |unit, value| {
                    unit.quantity = value.decode("quantity")?;
                    Ok(())
                },
            ),
        UnitProperty::new("weight")
            .field("weight_grams")
            .numeric()
            .input(grams_to_kilograms)
            .output(kilograms_to_grams)
            .slot(
                |unit| unit.weight_kg.into(),
                |unit, value| {
                    unit.weight_kg = value.decode("weight")?;
                    Ok(())
                },
            ),
        UnitProperty::new("location")
            .linked(&["location_sector", "location_slot"])
            .getter(|unit| unit.location.to_string().into())
            .setter(|unit, value| {
                let text: String = value.clone().decode("location")?;
                unit.location = text
                    .parse()
                    .map_err(|e| rejected("location", "sector:slot", &value, &e))?;
                Ok(())
            })
            .extract(extract_location)
            .inject(|unit, fields| {
                fields.insert("location_sector", unit.location.sector());
                fields.insert("location_slot", unit.location.slot());
            }),
        UnitProperty::new("serviced_on").field("serviced_on").slot(
            |unit| unit.serviced_on.map(format_date).into(),
            |unit, value| {
                let text: Option<String> = value.clone().decode("serviced_on")?;
                unit.serviced_on = text
                    .as_deref()
                    .map(parse_date)
                    .transpose()
                    .map_err(|e| rejected("serviced_on", "YYYY-MM-DD", &value, &e))?;
                Ok(())
            },
        ),
        UnitProperty::new("created_at")
            .field("created_at")
            .read_only()
            .getter(|unit| unit.created_at.map(OffsetDateTime::unix_timestamp).into())
            .extract(extract_created_at),
        UnitProperty::new("label")
            .linked(&["name"])
            .getter(|unit| format!("{} x{} @ {}", unit.name, unit.quantity, unit.location).into())
            .setter(|unit, value| {
                unit.name = value.decode("label")?;
                Ok(())
            }),
    ])
});

impl Unit {
    /// Creates an unsaved unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn fleet_id(&self) -> i64 {
        self.fleet_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Quantity as last loaded or set. Pending adjustments are not included.
    #[must_use]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    #[must_use]
    pub const fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub const fn serviced_on(&self) -> Option<Date> {
        self.serviced_on
    }

    /// Row creation time, assigned by the database.
    #[must_use]
    pub const fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }
}

impl Entity for Unit {
    const TABLE: &'static str = "units";

    fn scheme() -> &'static PropertyScheme<Self> {
        &UNIT_SCHEME
    }

    fn row_state(&self) -> &RowState {
        &self.row
    }

    fn row_state_mut(&mut self) -> &mut RowState {
        &mut self.row
    }

    fn is_empty(&self) -> bool {
        self.quantity <= 0
    }
}
