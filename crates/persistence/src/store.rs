// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! [`RowStore`] implementation over the active backend connection.

use dbrow::{Diagnostics, RawRow, RowError, RowStore, Select, Statement};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::{BackendConnection, Persistence};

impl RowStore for Persistence {
    fn execute(&mut self, statement: &Statement) -> Result<usize, RowError> {
        let affected = match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.execute_statement(statement),
            #[cfg(feature = "mysql")]
            BackendConnection::Mysql(conn) => conn.execute_statement(statement),
        }?;
        debug!(affected, "Statement executed");
        Ok(affected)
    }

    fn fetch_one(&mut self, select: &Select) -> Result<Option<RawRow>, RowError> {
        let row = match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.fetch_row(select),
            #[cfg(feature = "mysql")]
            BackendConnection::Mysql(conn) => conn.fetch_row(select),
        }?;
        Ok(row)
    }

    fn last_inserted_id(&mut self) -> Result<i64, RowError> {
        let id = match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.get_last_insert_rowid(),
            #[cfg(feature = "mysql")]
            BackendConnection::Mysql(conn) => conn.get_last_insert_rowid(),
        }?;
        Ok(id)
    }

    fn acquire_row_lock(&mut self, table: &str, id_field: &str, id: i64) -> Result<(), RowError> {
        match &mut self.conn {
            BackendConnection::Sqlite(_) => {
                debug!(table, id_field, id, "SQLite has no row locks, skipping");
            }
            #[cfg(feature = "mysql")]
            BackendConnection::Mysql(conn) => {
                crate::backend::mysql::lock_row(conn, table, id_field, id)?;
            }
        }
        Ok(())
    }

    fn is_transaction_open(&mut self) -> bool {
        self.transaction_depth() > 0
    }

    fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }
}
