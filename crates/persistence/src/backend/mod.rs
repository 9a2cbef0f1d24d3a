// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates the parts of the row store that cannot be written
//! once for every Diesel backend: connection setup, parameter binding on
//! boxed raw queries, row fetching and the last-insert id.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default, used by every test)
//! - `mysql`: MySQL/MariaDB backend, compiled with the `mysql` feature
//!
//! ## Row Fetching
//!
//! Statements produced by the engine select an arbitrary column list, which
//! Diesel cannot map onto a static struct. Backends therefore wrap the
//! engine's select in a JSON object projection and return a single text
//! column that is decoded with `serde_json` into a [`RawRow`].

/// Binds every statement parameter onto a boxed raw query.
///
/// The bound SQL type follows the `Value` variant, so the same macro body
/// serves every backend.
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param.clone() {
                ::dbrow::Value::Null => query
                    .bind::<::diesel::sql_types::Nullable<::diesel::sql_types::BigInt>, _>(
                        None::<i64>,
                    ),
                ::dbrow::Value::Bool(v) => query.bind::<::diesel::sql_types::Bool, _>(v),
                ::dbrow::Value::Int(v) => query.bind::<::diesel::sql_types::BigInt, _>(v),
                ::dbrow::Value::Float(v) => query.bind::<::diesel::sql_types::Double, _>(v),
                ::dbrow::Value::Text(v) => query.bind::<::diesel::sql_types::Text, _>(v),
            };
        }
        query
    }};
}

#[cfg(feature = "mysql")]
pub mod mysql;
pub mod sqlite;

use std::collections::HashMap;

use dbrow::{Escape, RawRow, Select, Statement, Value, quote_ident};
use diesel::sql_types::Text;
use diesel::{Connection, QueryableByName, SqliteConnection};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// This trait is implemented for both `SqliteConnection` and
/// `MysqlConnection`, so the [`dbrow::RowStore`] adapter can dispatch on the
/// connection once and stay backend-agnostic otherwise.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Executes a parameterized statement and returns the affected row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement is rejected.
    fn execute_statement(&mut self, statement: &Statement) -> Result<usize, PersistenceError>;

    /// Fetches at most one row for a select.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    fn fetch_row(&mut self, select: &Select) -> Result<Option<RawRow>, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<usize, PersistenceError> {
        sqlite::execute_statement(self, statement)
    }

    fn fetch_row(&mut self, select: &Select) -> Result<Option<RawRow>, PersistenceError> {
        sqlite::fetch_row(self, select)
    }
}

#[cfg(feature = "mysql")]
impl PersistenceBackend for diesel::MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<usize, PersistenceError> {
        mysql::execute_statement(self, statement)
    }

    fn fetch_row(&mut self, select: &Select) -> Result<Option<RawRow>, PersistenceError> {
        mysql::fetch_row(self, select)
    }
}

/// Helper row struct for the JSON row projection.
#[derive(QueryableByName)]
pub(crate) struct RowJson {
    #[diesel(sql_type = Text)]
    row_json: String,
}

impl RowJson {
    /// Decodes the projected JSON object into a raw row.
    pub(crate) fn into_raw_row(self) -> Result<RawRow, PersistenceError> {
        let fields: HashMap<String, Value> = serde_json::from_str(&self.row_json)?;
        Ok(fields.into_iter().collect())
    }
}

/// Builds the `function('col', `col`, ...)` object expression over the
/// selected columns.
pub(crate) fn json_object_expr(function: &str, columns: &[String]) -> String {
    let pairs: Vec<String> = columns
        .iter()
        .map(|column| {
            format!(
                "{}, {}",
                Value::from(column.as_str()).escape(),
                quote_ident(column)
            )
        })
        .collect();
    format!("{function}({})", pairs.join(", "))
}

/// Wraps the engine's select so it yields one `row_json` text column.
pub(crate) fn wrap_select(object_expr: &str, select: &Select) -> String {
    format!(
        "SELECT {object_expr} AS row_json FROM ({}) AS row_source",
        select.statement().sql()
    )
}
