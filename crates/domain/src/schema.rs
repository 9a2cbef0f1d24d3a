// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inventory schema.
//!
//! ## Schema Parity
//!
//! `migrations/` (`SQLite`) and `migrations_mysql/` (`MySQL`) must stay
//! schema-equivalent: same tables, same columns, same defaults. Every
//! change goes into both directories.

use dbrow_persistence::{BackendMigrations, Persistence, PersistenceError};
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use tracing::info;

/// SQLite-specific migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// `MySQL`-specific migrations.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// The inventory migrations for every backend.
#[must_use]
pub const fn migrations() -> BackendMigrations {
    BackendMigrations {
        sqlite: MIGRATIONS,
        mysql: MYSQL_MIGRATIONS,
    }
}

/// Creates or upgrades the inventory tables.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub fn initialize(persistence: &mut Persistence) -> Result<Vec<String>, PersistenceError> {
    let applied = persistence.run_migrations(migrations())?;
    info!(applied = applied.len(), "Inventory schema ready");
    Ok(applied)
}
