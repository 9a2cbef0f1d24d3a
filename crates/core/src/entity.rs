// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The entity contract and the per-instance row state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::codec;
use crate::dispatch;
use crate::error::RowError;
use crate::lifecycle;
use crate::materialize::{self, FieldSet};
use crate::scheme::PropertyScheme;
use crate::store::{RawRow, RowStore};
use crate::tracker::ChangeTracker;
use crate::value::{FromValue, Value};

/// A dependent row shared between its owner and the row cascading saves to it.
pub type DependentRow = Rc<RefCell<dyn Saveable>>;

/// Anything whose state can be written to a [`RowStore`].
pub trait Saveable {
    /// Persists the current state.
    ///
    /// The change tracker is cleared only after every dependent row has been
    /// saved. When a dependent fails, the row's own statement has already
    /// run and its pending deltas are still tracked, so a retry must follow
    /// a rollback of the enclosing transaction or the deltas apply twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects a statement.
    fn save(&mut self, store: &mut dyn RowStore) -> Result<(), RowError>;
}

/// Bookkeeping every row instance carries next to its domain fields.
pub struct RowState {
    id: i64,
    cacheable: bool,
    skip_lock: bool,
    tracker: ChangeTracker,
    dependents: Vec<DependentRow>,
}

impl Default for RowState {
    fn default() -> Self {
        Self {
            id: 0,
            cacheable: true,
            skip_lock: false,
            tracker: ChangeTracker::new(),
            dependents: Vec::new(),
        }
    }
}

impl fmt::Debug for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowState")
            .field("id", &self.id)
            .field("cacheable", &self.cacheable)
            .field("skip_lock", &self.skip_lock)
            .field("tracker", &self.tracker)
            .field("dependents", &self.dependents.len())
            .finish()
    }
}

impl RowState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary key; `0` until the row is persisted.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    pub(crate) const fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Hint for an external cache layer. Not used by the engine.
    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    pub const fn set_cacheable(&mut self, cacheable: bool) {
        self.cacheable = cacheable;
    }

    /// True while a load that skips the row lock is in progress.
    #[must_use]
    pub const fn skip_lock(&self) -> bool {
        self.skip_lock
    }

    pub(crate) const fn set_skip_lock(&mut self, skip_lock: bool) {
        self.skip_lock = skip_lock;
    }

    #[must_use]
    pub const fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub(crate) const fn tracker_mut(&mut self) -> &mut ChangeTracker {
        &mut self.tracker
    }

    /// Schedules `row` to be saved after this row on every save.
    pub fn add_dependent(&mut self, row: DependentRow) {
        self.dependents.push(row);
    }

    #[must_use]
    pub fn dependents(&self) -> &[DependentRow] {
        &self.dependents
    }

    pub fn clear_dependents(&mut self) {
        self.dependents.clear();
    }
}

/// A type persisted as one row of one table.
///
/// Implementors supply the table layout, the property scheme and the
/// domain meaning of "empty"; every access and lifecycle operation is
/// provided on top of those.
pub trait Entity: Sized + 'static {
    /// Table name.
    const TABLE: &'static str;
    /// Primary key column.
    const ID_FIELD: &'static str = "id";

    /// The property scheme of this entity type.
    fn scheme() -> &'static PropertyScheme<Self>;

    fn row_state(&self) -> &RowState;

    fn row_state_mut(&mut self) -> &mut RowState;

    /// True when the row has nothing worth persisting and should be deleted.
    fn is_empty(&self) -> bool;

    /// Acquires the row lock taken by `load`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to lock the row.
    fn lock_by_id(&self, store: &mut dyn RowStore, id: i64) -> Result<(), RowError> {
        store.acquire_row_lock(Self::TABLE, Self::ID_FIELD, id)
    }

    #[must_use]
    fn id(&self) -> i64 {
        self.row_state().id()
    }

    /// True until the row has been inserted.
    #[must_use]
    fn is_new(&self) -> bool {
        self.row_state().id() == 0
    }

    /// Reads a property through the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns `RowError::PropertyNotFound` for undeclared properties.
    fn get(&self, name: &str) -> Result<Value, RowError> {
        dispatch::get(self, name)
    }

    /// Reads a property and decodes it.
    ///
    /// # Errors
    ///
    /// Returns `RowError::PropertyNotFound` for undeclared properties and
    /// `RowError::TypeMismatch` if the value is not a `T`.
    fn get_as<T: FromValue>(&self, name: &str) -> Result<T, RowError> {
        dispatch::get(self, name)?.decode(name)
    }

    /// Writes a property through the dispatcher and marks it changed.
    ///
    /// # Errors
    ///
    /// Returns `RowError::PropertyNotFound`, `RowError::PropertyReadOnly` or
    /// `RowError::PropertyLocked` when the write is not allowed.
    fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RowError> {
        dispatch::set(self, name, value.into())
    }

    /// Schedules a delta to be added to the stored value on the next save.
    ///
    /// The in-memory value is not touched; reload to observe the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is unknown, read-only, not numeric or
    /// has a pending plain set.
    fn adjust(&mut self, name: &str, delta: impl Into<Value>) -> Result<(), RowError> {
        dispatch::adjust(self, name, delta.into())
    }

    /// Loads the row with primary key `id`. Returns whether a row was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a value cannot be decoded.
    fn load(&mut self, store: &mut dyn RowStore, id: i64, skip_lock: bool) -> Result<bool, RowError> {
        lifecycle::load(self, store, id, skip_lock)
    }

    /// Populates properties from a raw row without marking anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be decoded.
    fn parse_row(&mut self, row: &RawRow) -> Result<(), RowError> {
        codec::reconstruct(self, row)
    }

    /// Builds the storage field set, for insert or for update.
    #[must_use]
    fn field_set(&self, for_update: bool) -> FieldSet {
        materialize::field_set(self, for_update)
    }

    /// Inserts the row and returns the generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    fn insert(&mut self, store: &mut dyn RowStore) -> Result<i64, RowError> {
        lifecycle::insert(self, store)
    }

    /// Writes changed and adjusted fields of a persisted row.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    fn update(&mut self, store: &mut dyn RowStore) -> Result<(), RowError> {
        lifecycle::update(self, store)
    }

    /// Deletes the row and resets its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    fn delete(&mut self, store: &mut dyn RowStore) -> Result<(), RowError> {
        lifecycle::delete(self, store)
    }
}

impl<E: Entity> Saveable for E {
    fn save(&mut self, store: &mut dyn RowStore) -> Result<(), RowError> {
        lifecycle::save(self, store)
    }
}
