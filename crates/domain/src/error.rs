// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dbrow::{RowError, Value};

/// Errors that can occur while interpreting inventory values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unit kind code or name is not recognized.
    UnknownUnitKind(String),
    /// Location is not in `sector:slot` form or has negative parts.
    InvalidLocation(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Stored timestamp is outside the representable range.
    InvalidTimestamp(i64),
    /// Units can only be attached to a fleet that has been saved.
    FleetNotPersisted,
    /// A unit could not be attached to a fleet.
    AttachFailed(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUnitKind(kind) => write!(f, "Unknown unit kind: {kind}"),
            Self::InvalidLocation(location) => {
                write!(f, "Invalid location '{location}', expected sector:slot")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidTimestamp(seconds) => write!(f, "Invalid timestamp: {seconds}"),
            Self::FleetNotPersisted => write!(f, "Fleet must be saved before units are attached"),
            Self::AttachFailed(msg) => write!(f, "Failed to attach unit: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}

/// Domain failures inside property setters surface as a type mismatch on
/// the property being written.
pub(crate) fn rejected(
    property: &str,
    expected: &'static str,
    value: &Value,
    err: &DomainError,
) -> RowError {
    tracing::debug!(property, error = %err, "Rejected property value");
    RowError::TypeMismatch {
        property: property.to_string(),
        expected,
        found: value.kind(),
    }
}
