// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row lifecycle: load, and the insert/update/delete decision on save.
//!
//! ```text
//!          insert                     delete
//!   New ───────────▶ Persisted ───────────────▶ New
//!                     │    ▲
//!                     └────┘ update
//! ```
//!
//! Defensive checks never abort an operation. They are reported to the
//! store's diagnostics sink and the operation proceeds.

use std::rc::Rc;

use tracing::{debug, info};

use crate::codec;
use crate::entity::Entity;
use crate::error::{Inconsistency, RowError};
use crate::materialize;
use crate::store::{RawRow, RowStore};

fn report<E: Entity>(store: &dyn RowStore, inconsistency: &Inconsistency) {
    store.diagnostics().report(E::TABLE, inconsistency);
}

/// Loads the row with primary key `id` into `entity`.
///
/// A non-positive id is reported and ignored. When no row exists the id is
/// still set and `Ok(false)` is returned.
pub(crate) fn load<E: Entity>(
    entity: &mut E,
    store: &mut dyn RowStore,
    id: i64,
    skip_lock: bool,
) -> Result<bool, RowError> {
    if id <= 0 {
        report::<E>(store, &Inconsistency::InvalidIdentifier { id });
        return Ok(false);
    }

    let state = entity.row_state_mut();
    state.set_id(id);
    state.set_skip_lock(skip_lock);

    let fetched = fetch(entity, store, id, skip_lock);
    entity.row_state_mut().set_skip_lock(false);

    match fetched? {
        Some(row) => {
            codec::reconstruct(entity, &row)?;
            debug!(table = E::TABLE, id, "Row loaded");
            Ok(true)
        }
        None => {
            debug!(table = E::TABLE, id, "Row not found");
            Ok(false)
        }
    }
}

fn fetch<E: Entity>(
    entity: &E,
    store: &mut dyn RowStore,
    id: i64,
    skip_lock: bool,
) -> Result<Option<RawRow>, RowError> {
    if !skip_lock {
        entity.lock_by_id(store, id)?;
    }
    let select = materialize::select_statement::<E>(id);
    debug!(table = E::TABLE, sql = %select.statement(), "Fetching row");
    store.fetch_one(&select)
}

/// Persists `entity`, choosing insert, update or delete, then cascades to
/// its dependent rows and clears the change tracker.
pub(crate) fn save<E: Entity>(entity: &mut E, store: &mut dyn RowStore) -> Result<(), RowError> {
    if entity.is_new() {
        if entity.is_empty() {
            report::<E>(store, &Inconsistency::InsertOfEmpty);
        }
        insert(entity, store)?;
    } else if entity.is_empty() {
        delete(entity, store)?;
    } else {
        if !store.is_transaction_open() {
            report::<E>(store, &Inconsistency::UpdateWithoutTransaction);
        }
        update(entity, store)?;
    }

    let dependents: Vec<_> = entity.row_state().dependents().iter().map(Rc::clone).collect();
    for dependent in dependents {
        let mut row = dependent
            .try_borrow_mut()
            .map_err(|_| RowError::DependentBusy { table: E::TABLE })?;
        row.save(store)?;
    }

    entity.row_state_mut().tracker_mut().clear();
    Ok(())
}

/// Inserts `entity` and records the generated id.
pub(crate) fn insert<E: Entity>(entity: &mut E, store: &mut dyn RowStore) -> Result<i64, RowError> {
    if !entity.is_new() {
        report::<E>(
            store,
            &Inconsistency::InsertOfPersisted { id: entity.id() },
        );
    }

    let fields = materialize::field_set(entity, false);
    let statement = materialize::insert_statement::<E>(&fields);
    debug!(table = E::TABLE, sql = %statement, "Executing insert");
    store.execute(&statement)?;

    let id = store.last_inserted_id()?;
    if id <= 0 {
        report::<E>(store, &Inconsistency::InsertFailed);
    }
    entity.row_state_mut().set_id(id.max(0));

    info!(table = E::TABLE, id, "Row inserted");
    Ok(id)
}

/// Updates the dirty fields of `entity`. Nothing is executed when no field
/// qualifies.
pub(crate) fn update<E: Entity>(entity: &mut E, store: &mut dyn RowStore) -> Result<(), RowError> {
    if entity.is_new() {
        report::<E>(store, &Inconsistency::NewWithoutId { operation: "update" });
    }

    let fields = materialize::field_set(entity, true);
    let Some(statement) = materialize::update_statement(entity, &fields) else {
        debug!(table = E::TABLE, id = entity.id(), "Nothing to update");
        return Ok(());
    };

    debug!(table = E::TABLE, sql = %statement, "Executing update");
    store.execute(&statement)?;
    Ok(())
}

/// Deletes `entity` and resets its id so the instance reads as new.
pub(crate) fn delete<E: Entity>(entity: &mut E, store: &mut dyn RowStore) -> Result<(), RowError> {
    if entity.is_new() {
        report::<E>(store, &Inconsistency::NewWithoutId { operation: "delete" });
    }

    let id = entity.id();
    let statement = materialize::delete_statement::<E>(id);
    debug!(table = E::TABLE, sql = %statement, "Executing delete");
    store.execute(&statement)?;
    entity.row_state_mut().set_id(0);

    info!(table = E::TABLE, id, "Row deleted");
    Ok(())
}
