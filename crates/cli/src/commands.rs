// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::cell::RefCell;
use std::rc::Rc;

use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use dbrow::{Entity, Saveable, Value};
use dbrow_domain::{Fleet, Unit};
use dbrow_persistence::Persistence;
use serde_json::{Map, json};
use tracing::info;

use crate::{Command, Table};

impl Command {
    pub(crate) fn run(
        self,
        persistence: &mut Persistence,
        applied: &[String],
    ) -> Result<serde_json::Value> {
        match self {
            Self::Init => Ok(json!({ "applied": applied })),
            Self::AddFleet { name, code } => add_fleet(persistence, name, code),
            Self::AddUnit {
                name,
                quantity,
                kind,
                weight,
                location,
                serviced_on,
                fleet,
            } => {
                let mut unit = Unit::new();
                unit.set("name", name)?;
                unit.set("quantity", quantity)?;
                unit.set("kind", kind)?;
                unit.set("weight", weight)?;
                if let Some(location) = location {
                    unit.set("location", location)?;
                }
                unit.set("serviced_on", serviced_on)?;
                add_unit(persistence, unit, fleet)
            }
            Self::Show { table, id } => match table {
                Table::Fleet => render(&load::<Fleet>(persistence, id)?),
                Table::Unit => render(&load::<Unit>(persistence, id)?),
            },
            Self::Set {
                table,
                id,
                property,
                value,
            } => {
                let value = parse_value(&value);
                match table {
                    Table::Fleet => {
                        modify::<Fleet, _>(persistence, id, |row| row.set(&property, value))
                    }
                    Table::Unit => {
                        modify::<Unit, _>(persistence, id, |row| row.set(&property, value))
                    }
                }
            }
            Self::Adjust {
                table,
                id,
                property,
                delta,
            } => {
                let delta = parse_value(&delta);
                match table {
                    Table::Fleet => {
                        modify::<Fleet, _>(persistence, id, |row| row.adjust(&property, delta))
                    }
                    Table::Unit => {
                        modify::<Unit, _>(persistence, id, |row| row.adjust(&property, delta))
                    }
                }
            }
            Self::Remove { table, id } => match table {
                Table::Fleet => remove::<Fleet>(persistence, id),
                Table::Unit => remove::<Unit>(persistence, id),
            },
        }
    }
}

/// Reads a command-line argument as the narrowest matching value.
pub(crate) fn parse_value(text: &str) -> Value {
    match text {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = text.parse::<i64>() {
        return Value::Int(int);
    }
    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => Value::Float(float),
        _ => Value::from(text),
    }
}

/// JSON object of every readable property, keyed by property name.
pub(crate) fn render<E: Entity>(entity: &E) -> Result<serde_json::Value> {
    let mut object = Map::new();
    object.insert(E::ID_FIELD.to_string(), entity.id().into());
    for property in E::scheme().iter() {
        let value = entity.get(property.name())?;
        object.insert(property.name().to_string(), serde_json::to_value(value)?);
    }
    Ok(serde_json::Value::Object(object))
}

fn load<E: Entity + Default>(persistence: &mut Persistence, id: i64) -> Result<E> {
    let mut entity = E::default();
    if !entity.load(persistence, id, false)? {
        bail!("No {} row with id {id}", E::TABLE);
    }
    Ok(entity)
}

fn add_fleet(
    persistence: &mut Persistence,
    name: String,
    code: Option<String>,
) -> Result<serde_json::Value> {
    let mut fleet = Fleet::new();
    fleet.set("name", name)?;
    fleet.set("code", code)?;
    let id = persistence.transaction(|p| -> Result<i64> {
        fleet.save(p)?;
        Ok(fleet.id())
    })?;
    info!(id, "Fleet created");
    render(&load::<Fleet>(persistence, id)?)
}

fn add_unit(
    persistence: &mut Persistence,
    unit: Unit,
    fleet_id: Option<i64>,
) -> Result<serde_json::Value> {
    let unit = Rc::new(RefCell::new(unit));
    persistence.transaction(|p| -> Result<()> {
        match fleet_id {
            Some(fleet_id) => {
                let mut fleet = load::<Fleet>(p, fleet_id)?;
                fleet.attach(Rc::clone(&unit))?;
                fleet.save(p)?;
            }
            None => unit.borrow_mut().save(p)?,
        }
        Ok(())
    })?;

    let id = unit.borrow().id();
    if id == 0 {
        return Err(eyre!("Unit was empty and has not been stored"));
    }
    info!(id, "Unit created");
    render(&load::<Unit>(persistence, id)?)
}

/// Loads a row, applies `change` and saves it in one transaction, then
/// prints the row as stored.
fn modify<E, F>(persistence: &mut Persistence, id: i64, change: F) -> Result<serde_json::Value>
where
    E: Entity + Default,
    F: FnOnce(&mut E) -> Result<(), dbrow::RowError>,
{
    let emptied = persistence.transaction(|p| -> Result<bool> {
        let mut entity = load::<E>(p, id)?;
        change(&mut entity)?;
        entity.save(p)?;
        Ok(entity.is_new())
    })?;

    if emptied {
        info!(table = E::TABLE, id, "Row became empty and was deleted");
        return Ok(deleted::<E>(id));
    }
    render(&load::<E>(persistence, id)?)
}

fn remove<E: Entity + Default>(persistence: &mut Persistence, id: i64) -> Result<serde_json::Value> {
    persistence.transaction(|p| -> Result<()> {
        let mut entity = load::<E>(p, id)?;
        entity.delete(p)?;
        Ok(())
    })?;
    info!(table = E::TABLE, id, "Row removed");
    Ok(deleted::<E>(id))
}

fn deleted<E: Entity>(id: i64) -> serde_json::Value {
    let mut object = Map::new();
    object.insert(E::ID_FIELD.to_string(), id.into());
    object.insert(String::from("deleted"), true.into());
    serde_json::Value::Object(object)
}
