// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inventory entities persisted through dbrow.
//!
//! - [`Unit`]: a stocked quantity at a location. Quantities move with
//!   relative adjustments, weights are converted between kilograms and
//!   stored grams, and the location spans two columns.
//! - [`Fleet`]: a named group of units that saves its units with itself.

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

mod error;
mod fleet;
pub mod schema;
mod types;
mod unit;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use fleet::Fleet;
pub use types::{Location, UnitKind, format_date, parse_date, timestamp_from_unix};
pub use unit::Unit;
