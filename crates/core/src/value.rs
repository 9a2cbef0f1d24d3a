// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dynamically typed property and column values.
//!
//! `Value` is the currency every layer of the engine speaks: raw rows are
//! maps of `Value`, property slots read and write `Value`, and statements
//! carry their parameters as `Value`.

use serde::{Deserialize, Serialize};

use crate::error::RowError;

/// A single stored or in-memory property value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL` / absent.
    #[default]
    Null,
    /// Boolean, stored as `0`/`1`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
}

impl Value {
    /// Returns true if the value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the value can take part in delta arithmetic.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Returns the value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// A short name of the variant, used in type mismatch errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    /// Adds two numeric values.
    ///
    /// Integer plus integer stays an integer; any float promotes the result.
    /// `Null` acts as zero so a fresh accumulator can start from it.
    ///
    /// Returns `None` if either side is not numeric or the integer sum
    /// overflows.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Null, rhs) if rhs.is_numeric() => Some(rhs.clone()),
            (Self::Int(a), Self::Int(b)) => a.checked_add(*b).map(Self::Int),
            (lhs, rhs) if lhs.is_numeric() && rhs.is_numeric() => {
                Some(Self::Float(lhs.as_f64()? + rhs.as_f64()?))
            }
            _ => None,
        }
    }

    /// Decodes the value into a concrete Rust type.
    ///
    /// # Errors
    ///
    /// Returns `RowError::TypeMismatch` if the value cannot be represented
    /// as `T`.
    pub fn decode<T: FromValue>(self, property: &str) -> Result<T, RowError> {
        let found = self.kind();
        T::from_value(self).ok_or_else(|| RowError::TypeMismatch {
            property: property.to_string(),
            expected: T::EXPECTED,
            found,
        })
    }
}

/// Conversion from a `Value` into a typed property field.
pub trait FromValue: Sized {
    /// Human readable name of the expected kind.
    const EXPECTED: &'static str;

    /// Converts the value, returning `None` on a kind mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64().and_then(|v| Self::try_from(v).ok())
    }
}

impl FromValue for u32 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64().and_then(|v| Self::try_from(v).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            Value::Int(v) => Some(v != 0),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A value that has already been made safe for inclusion in SQL text.
///
/// Holding a `SqlLiteral` is the proof that escaping happened; escaping it
/// again returns it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    /// The literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escapes a value into a SQL literal.
pub trait Escape {
    /// Produces the safe literal for this value.
    fn escape(&self) -> SqlLiteral;
}

impl Escape for SqlLiteral {
    fn escape(&self) -> SqlLiteral {
        self.clone()
    }
}

impl Escape for Value {
    fn escape(&self) -> SqlLiteral {
        let text = match self {
            Self::Null => String::from("NULL"),
            Self::Bool(v) => String::from(if *v { "1" } else { "0" }),
            Self::Int(v) => v.to_string(),
            Self::Float(v) if v.is_finite() => v.to_string(),
            Self::Float(_) => String::from("NULL"),
            Self::Text(v) => format!("'{}'", v.replace('\'', "''")),
        };
        SqlLiteral(text)
    }
}
