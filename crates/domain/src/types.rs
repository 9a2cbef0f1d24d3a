// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Storage format of calendar dates.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// How a unit is packaged. Stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitKind {
    /// Individual loose items.
    #[default]
    Loose,
    /// A sealed crate.
    Crate,
    /// A full pallet.
    Pallet,
}

impl UnitKind {
    /// The stored code of this kind.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Loose => 0,
            Self::Crate => 1,
            Self::Pallet => 2,
        }
    }

    /// Resolves a stored code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownUnitKind` for an unassigned code.
    pub fn from_code(code: i64) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::Loose),
            1 => Ok(Self::Crate),
            2 => Ok(Self::Pallet),
            _ => Err(DomainError::UnknownUnitKind(code.to_string())),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Crate => "crate",
            Self::Pallet => "pallet",
        }
    }
}

impl FromStr for UnitKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loose" => Ok(Self::Loose),
            "crate" => Ok(Self::Crate),
            "pallet" => Ok(Self::Pallet),
            _ => Err(DomainError::UnknownUnitKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A storage position, persisted as two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Location {
    sector: i64,
    slot: i64,
}

impl Location {
    /// Creates a location.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` if either part is negative.
    pub fn new(sector: i64, slot: i64) -> Result<Self, DomainError> {
        if sector < 0 || slot < 0 {
            return Err(DomainError::InvalidLocation(format!("{sector}:{slot}")));
        }
        Ok(Self { sector, slot })
    }

    #[must_use]
    pub const fn sector(&self) -> i64 {
        self.sector
    }

    #[must_use]
    pub const fn slot(&self) -> i64 {
        self.slot
    }
}

impl FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidLocation(s.to_string());
        let (sector, slot) = s.split_once(':').ok_or_else(invalid)?;
        let sector: i64 = sector.trim().parse().map_err(|_| invalid())?;
        let slot: i64 = slot.trim().parse().map_err(|_| invalid())?;
        Self::new(sector, slot).map_err(|_| invalid())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.sector, self.slot)
    }
}

/// Parses a stored `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the text is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, DomainError> {
    Date::parse(text, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: text.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date in its stored `YYYY-MM-DD` form.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Converts stored unix seconds into a UTC timestamp.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the value is out of range.
pub fn timestamp_from_unix(seconds: i64) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| DomainError::InvalidTimestamp(seconds))
}
