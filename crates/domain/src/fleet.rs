// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleets group units and save them along with themselves.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use dbrow::{DependentRow, Entity, PropertyDescriptor, PropertyScheme, RowState};
use tracing::debug;

use crate::error::DomainError;
use crate::unit::Unit;

/// A named group of units.
#[derive(Debug, Default)]
pub struct Fleet {
    row: RowState,
    name: String,
    code: Option<String>,
    units: Vec<Rc<RefCell<Unit>>>,
}

type FleetProperty = PropertyDescriptor<Fleet>;

static FLEET_SCHEME: LazyLock<PropertyScheme<Fleet>> = LazyLock::new(|| {
    PropertyScheme::new(vec![
        FleetProperty::new("name").field("name").slot(
            |fleet| fleet.name.clone().into(),
            |fleet, value| {
                fleet.name = value.decode::<Option<String>>("name")?.unwrap_or_default();
                Ok(())
            },
        ),
        FleetProperty::new("code")
            .field("code")
            .output(|value| match value {
                dbrow::Value::Text(code) => dbrow::Value::Text(code.to_uppercase()),
                other => other,
            })
            .slot(
                |fleet| fleet.code.clone().into(),
                |fleet, value| {
                    fleet.code = value.decode("code")?;
                    Ok(())
                },
            ),
    ])
});

impl Fleet {
    /// Creates an unsaved fleet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Attaches `unit` to this fleet.
    ///
    /// The unit's fleet reference is set to this fleet's id and the unit is
    /// saved whenever the fleet is saved, after the fleet itself.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FleetNotPersisted` if the fleet has no id yet,
    /// and `DomainError::AttachFailed` if the unit cannot be updated.
    pub fn attach(&mut self, unit: Rc<RefCell<Unit>>) -> Result<(), DomainError> {
        if self.is_new() {
            return Err(DomainError::FleetNotPersisted);
        }

        unit.try_borrow_mut()
            .map_err(|e| DomainError::AttachFailed(e.to_string()))?
            .set("fleet", self.id())
            .map_err(|e| DomainError::AttachFailed(e.to_string()))?;

        let dependent: DependentRow = unit.clone();
        self.row.add_dependent(dependent);
        self.units.push(unit);
        debug!(fleet = self.id(), units = self.units.len(), "Unit attached");
        Ok(())
    }

    /// Units attached to this fleet.
    #[must_use]
    pub fn units(&self) -> &[Rc<RefCell<Unit>>] {
        &self.units
    }

    /// Sum of the in-memory quantities of the attached units.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.units.iter().map(|unit| unit.borrow().quantity()).sum()
    }
}

impl Entity for Fleet {
    const TABLE: &'static str = "fleets";

    fn scheme() -> &'static PropertyScheme<Self> {
        &FLEET_SCHEME
    }

    fn row_state(&self) -> &RowState {
        &self.row
    }

    fn row_state_mut(&mut self) -> &mut RowState {
        &mut self.row
    }

    fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}
