// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! `SQLite` has no row-level locks; the row store logs the lock request and
//! relies on the database-wide write lock of the open transaction.

use dbrow::{RawRow, Select, Statement};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::Sqlite;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use tracing::info;

use super::{RowJson, json_object_expr, wrap_select};
use crate::error::PersistenceError;

/// Helper function to get the last inserted row ID.
///
/// This is a justified use of raw SQL as Diesel has no direct API for this.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Executes an engine statement with its parameters bound.
///
/// # Errors
///
/// Returns an error if the statement is rejected.
pub fn execute_statement(
    conn: &mut SqliteConnection,
    statement: &Statement,
) -> Result<usize, PersistenceError> {
    let query = bind_params!(
        diesel::sql_query(statement.sql()).into_boxed::<Sqlite>(),
        statement.params()
    );
    query
        .execute(conn)
        .map_err(|e| PersistenceError::statement(statement.sql(), &e))
}

/// Fetches one row through a `json_object` projection.
///
/// # Errors
///
/// Returns an error if the query fails or the JSON cannot be decoded.
pub fn fetch_row(
    conn: &mut SqliteConnection,
    select: &Select,
) -> Result<Option<RawRow>, PersistenceError> {
    let sql = wrap_select(&json_object_expr("json_object", select.columns()), select);
    let query = bind_params!(
        diesel::sql_query(sql.as_str()).into_boxed::<Sqlite>(),
        select.statement().params()
    );
    query
        .get_result::<RowJson>(conn)
        .optional()
        .map_err(|e| PersistenceError::statement(&sql, &e))?
        .map(RowJson::into_raw_row)
        .transpose()
}

/// Opens a `SQLite` database at the given URL.
///
/// # Arguments
///
/// * `database_url` - The `SQLite` database URL (e.g., `":memory:"` or file path)
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", database_url);

    SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::statement("PRAGMA journal_mode = WAL", &e))?;
    Ok(())
}
