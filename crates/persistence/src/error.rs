// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dbrow::RowError;

/// Errors raised by the database adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database could not be opened.
    ConnectionFailed(String),
    /// A database file path is not valid UTF-8.
    InvalidPath(String),
    /// A migration could not be applied.
    MigrationFailed(String),
    /// The database rejected a statement.
    StatementFailed {
        /// SQL text of the statement, with placeholders.
        sql: String,
        /// Database error message.
        message: String,
    },
    /// A helper query issued by the adapter itself failed.
    QueryFailed(String),
    /// A fetched row could not be decoded.
    MalformedRow(String),
    /// Opening, committing or rolling back a transaction failed.
    TransactionFailed(String),
}

impl PersistenceError {
    /// Wraps a Diesel error raised while running `sql`.
    pub(crate) fn statement(sql: &str, err: &diesel::result::Error) -> Self {
        Self::StatementFailed {
            sql: sql.to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Database connection failed: {msg}"),
            Self::InvalidPath(path) => write!(f, "Invalid database path: {path}"),
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::StatementFailed { sql, message } => {
                write!(f, "Statement failed: {message} (sql: {sql})")
            }
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::MalformedRow(msg) => write!(f, "Malformed row: {msg}"),
            Self::TransactionFailed(msg) => write!(f, "Transaction failed: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::QueryFailed(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedRow(err.to_string())
    }
}

/// Adapter failures reach entities as storage errors.
impl From<PersistenceError> for RowError {
    fn from(err: PersistenceError) -> Self {
        Self::Storage(Box::new(err))
    }
}
