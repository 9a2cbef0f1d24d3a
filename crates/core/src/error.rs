// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the row engine.
//!
//! `RowError` is surfaced to the caller. `Inconsistency` is never returned:
//! it is handed to the store's diagnostics sink and the operation carries on.

use thiserror::Error;

/// Errors surfaced by property access and row lifecycle operations.
#[derive(Debug, Error)]
pub enum RowError {
    /// The property is not declared in the entity's scheme.
    #[error("Property '{property}' does not exist on {table}")]
    PropertyNotFound {
        table: &'static str,
        property: String,
    },

    /// The property is declared read-only.
    #[error("Property '{property}' on {table} is read-only")]
    PropertyReadOnly {
        table: &'static str,
        property: &'static str,
    },

    /// The property has a pending change of the other kind and must be saved first.
    #[error("Property '{property}' on {table} has a pending change and is locked until save")]
    PropertyLocked {
        table: &'static str,
        property: &'static str,
    },

    /// The property or delta cannot take part in a delta update.
    #[error("Property '{property}' on {table} cannot be adjusted: {reason}")]
    PropertyNotAdjustable {
        table: &'static str,
        property: &'static str,
        reason: &'static str,
    },

    /// A value could not be converted into the property's type.
    #[error("Property '{property}' expects {expected}, got {found}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A dependent row was already borrowed while cascading a save.
    #[error("Dependent row of {table} is already in use and cannot be saved")]
    DependentBusy { table: &'static str },

    /// The storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Non-fatal defensive findings reported through the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Inconsistency {
    /// `load` was called with a non-positive identifier.
    #[error("load called with non-positive id {id}")]
    InvalidIdentifier { id: i64 },

    /// A new row with nothing to persist is being inserted.
    #[error("row is empty on save, inserting anyway")]
    InsertOfEmpty,

    /// An update is executing outside of an open transaction.
    #[error("transaction should always be started on update")]
    UpdateWithoutTransaction,

    /// `insert` was called on a row that already has an id.
    #[error("row id {id} is not empty on insert")]
    InsertOfPersisted { id: i64 },

    /// `update` or `delete` was called on a row without an id.
    #[error("row id is empty on {operation}")]
    NewWithoutId { operation: &'static str },

    /// The insert did not produce a positive identifier.
    #[error("error saving record: insert produced no id")]
    InsertFailed,
}
