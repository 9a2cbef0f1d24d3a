// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # dbrow
//!
//! Command-line access to the inventory rows of a dbrow database.
//!
//! Every command opens the database, brings the schema up to date and
//! prints the affected row as JSON. Writes run inside a transaction.
//!
//! Without `--database` an in-memory database is used, which only lives for
//! the duration of one command.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod commands;
#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use dbrow_domain::schema;
use dbrow_persistence::Persistence;
use tracing::level_filters::LevelFilter;
use tracing::info;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(name = "dbrow", version, about)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// `MySQL` connection URL. Takes precedence over `--database`.
    #[cfg(feature = "mysql")]
    #[arg(long, global = true)]
    mysql_url: Option<String>,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        let mut persistence = self.open()?;
        let applied = schema::initialize(&mut persistence)?;
        let output = self.command.run(&mut persistence, &applied)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn open(&self) -> Result<Persistence> {
        #[cfg(feature = "mysql")]
        if let Some(url) = &self.mysql_url {
            info!("Using MySQL database");
            return Ok(Persistence::new_with_mysql(url)?);
        }

        let persistence = if let Some(path) = &self.database {
            info!("Using file-based database at: {path}");
            Persistence::new_with_file(path)?
        } else {
            info!("Using in-memory database");
            Persistence::new_in_memory()?
        };
        Ok(persistence)
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

/// Row types reachable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Table {
    Fleet,
    Unit,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations and list them
    Init,

    /// Create a fleet
    #[command(visible_alias = "af")]
    AddFleet {
        name: String,

        /// Short fleet code, stored upper-case
        #[arg(long)]
        code: Option<String>,
    },

    /// Create a unit, optionally attached to a fleet
    #[command(visible_alias = "au")]
    AddUnit {
        name: String,

        #[arg(short = 'n', long, default_value_t = 1)]
        quantity: i64,

        /// loose, crate or pallet
        #[arg(short, long, default_value = "loose")]
        kind: String,

        /// Weight in kilograms
        #[arg(short, long)]
        weight: Option<f64>,

        /// Storage position as sector:slot
        #[arg(short, long)]
        location: Option<String>,

        /// Last service date as YYYY-MM-DD
        #[arg(long)]
        serviced_on: Option<String>,

        /// Id of the fleet to attach the unit to
        #[arg(short, long)]
        fleet: Option<i64>,
    },

    /// Print a row
    Show { table: Table, id: i64 },

    /// Replace a property value
    Set {
        table: Table,
        id: i64,
        property: String,
        /// Integers, decimals, true, false and null are typed, anything else is text
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Add a delta to a numeric property at the database
    Adjust {
        table: Table,
        id: i64,
        property: String,
        #[arg(allow_hyphen_values = true)]
        delta: String,
    },

    /// Delete a row
    #[command(visible_alias = "rm")]
    Remove { table: Table, id: i64 },
}
