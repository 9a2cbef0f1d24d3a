// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage collaborator contract.
//!
//! The engine never talks to a database directly. It builds parameterized
//! [`Statement`]s and hands them to a [`RowStore`], which owns the connection,
//! the transaction state and the lock primitive.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, error};

use crate::error::{Inconsistency, RowError};
use crate::value::{Escape, Value};

/// A parameterized SQL statement.
///
/// Values are never interpolated into `sql`; each `?` placeholder binds the
/// next entry of `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    /// Creates a statement from SQL text and its bound parameters.
    #[must_use]
    pub const fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// The SQL text with `?` placeholders.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Renders the statement with every placeholder replaced by its escaped
    /// literal. Only meant for logs and diagnostics.
    #[must_use]
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.sql.len());
        let mut params = self.params.iter();
        for ch in self.sql.chars() {
            if ch == '?' {
                match params.next() {
                    Some(value) => rendered.push_str(value.escape().as_str()),
                    None => rendered.push(ch),
                }
            } else {
                rendered.push(ch);
            }
        }
        rendered
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A single-row select along with the columns it projects.
///
/// Stores that cannot read columns by name from an arbitrary result set
/// use `columns` to shape the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    statement: Statement,
    columns: Vec<String>,
}

impl Select {
    /// Creates a select from its statement and projected columns.
    #[must_use]
    pub const fn new(statement: Statement, columns: Vec<String>) -> Self {
        Self { statement, columns }
    }

    /// The underlying statement.
    #[must_use]
    pub const fn statement(&self) -> &Statement {
        &self.statement
    }

    /// The projected column names, in select order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// One raw row as returned by storage, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, Value>,
}

impl RawRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a column, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the value of a column, or `Null` when the column is absent.
    #[must_use]
    pub fn value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    /// Sets a column value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Sink for non-fatal inconsistencies found by defensive checks.
pub trait Diagnostics {
    /// Records one inconsistency observed on `table`.
    fn report(&self, table: &str, inconsistency: &Inconsistency);
}

/// Default diagnostics sink: logs every report at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, table: &str, inconsistency: &Inconsistency) {
        error!(target: "dbrow::inconsistency", table, "{inconsistency}");
    }
}

/// The storage collaborator a row is loaded from and saved to.
pub trait RowStore {
    /// Executes a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns `RowError::Storage` if the statement is rejected.
    fn execute(&mut self, statement: &Statement) -> Result<usize, RowError>;

    /// Fetches at most one row.
    ///
    /// # Errors
    ///
    /// Returns `RowError::Storage` if the query is rejected.
    fn fetch_one(&mut self, select: &Select) -> Result<Option<RawRow>, RowError>;

    /// Returns the primary key generated by the last insert.
    ///
    /// # Errors
    ///
    /// Returns `RowError::Storage` if the id cannot be retrieved.
    fn last_inserted_id(&mut self) -> Result<i64, RowError>;

    /// Acquires a row-level lock for the current transaction.
    ///
    /// Locks are advisory at this layer; stores without a row lock keep the
    /// default no-op.
    ///
    /// # Errors
    ///
    /// Returns `RowError::Storage` if the lock query fails.
    fn acquire_row_lock(&mut self, table: &str, id_field: &str, id: i64) -> Result<(), RowError> {
        debug!(table, id_field, id, "Row lock not supported by store, skipping");
        Ok(())
    }

    /// Returns true if a transaction is currently open.
    fn is_transaction_open(&mut self) -> bool;

    /// The sink inconsistencies are reported to.
    fn diagnostics(&self) -> &dyn Diagnostics {
        &TracingDiagnostics
    }
}
