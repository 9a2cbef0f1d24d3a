// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row-persistence engine.
//!
//! Maps in-memory entity state to a single relational row, tracks which
//! properties were mutated since the last save and produces minimal,
//! parameterized statements for insert, update and delete.
//!
//! ## Building Blocks
//!
//! - [`PropertyScheme`]: static, per-entity table of [`PropertyDescriptor`]s
//! - `codec`: input/output conversions and row reconstruction
//! - [`ChangeTracker`]: changed vs. adjusted properties per instance
//! - `dispatch`: the single entry point for external get/set/adjust
//! - `lifecycle`: load and the insert/update/delete decision on save
//! - `materialize`: field sets and statements
//!
//! The database itself is a collaborator behind the [`RowStore`] trait and
//! is passed explicitly to every operation that needs it.
//!
//! ## Delta Updates
//!
//! `adjust` does not touch the in-memory value. The pending delta is written
//! as `` `field` = `field` + (?) `` so concurrent adjusters never overwrite
//! each other. Reload the row to observe the result.
//!
//! ## Defensive Checks
//!
//! Inserting an empty row, updating outside a transaction and similar
//! inconsistencies are reported to [`Diagnostics`] and the operation goes
//! ahead anyway. They are developer diagnostics, not failures.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

pub mod codec;
mod dispatch;
mod entity;
mod error;
mod lifecycle;
pub mod materialize;
mod scheme;
mod store;
mod tracker;
mod value;

#[cfg(test)]
mod tests;

pub use entity::{DependentRow, Entity, RowState, Saveable};
pub use error::{Inconsistency, RowError};
pub use materialize::{FieldSet, FieldValue, quote_ident};
pub use scheme::{
    Conversion, Extractor, Getter, Injector, OutputMethod, PropertyDescriptor, PropertyScheme,
    Setter, Slot,
};
pub use store::{Diagnostics, RawRow, RowStore, Select, Statement, TracingDiagnostics};
pub use tracker::ChangeTracker;
pub use value::{Escape, FromValue, SqlLiteral, Value};
