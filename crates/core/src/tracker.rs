// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-instance change tracking.
//!
//! A property is either *changed* (its live value replaces the stored one)
//! or *adjusted* (a pending delta is added to the stored value by the
//! database). Never both within one save cycle.

use std::collections::{BTreeMap, BTreeSet};

use crate::value::Value;

/// Properties mutated since the last save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeTracker {
    changed: BTreeSet<&'static str>,
    adjusted: BTreeMap<&'static str, Value>,
}

impl ChangeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a plain set of `property`.
    pub fn mark_changed(&mut self, property: &'static str) {
        self.changed.insert(property);
    }

    /// Adds `delta` to the pending adjustment of `property`.
    ///
    /// Returns `None` and leaves the tracker untouched if the delta is not
    /// numeric or the sum overflows.
    pub fn accumulate(&mut self, property: &'static str, delta: &Value) -> Option<&Value> {
        let current = self.adjusted.get(property).cloned().unwrap_or(Value::Int(0));
        let sum = current.checked_add(delta)?;
        self.adjusted.insert(property, sum);
        self.adjusted.get(property)
    }

    #[must_use]
    pub fn is_changed(&self, property: &str) -> bool {
        self.changed.contains(property)
    }

    #[must_use]
    pub fn is_adjusted(&self, property: &str) -> bool {
        self.adjusted.contains_key(property)
    }

    /// True if the property has any pending change.
    #[must_use]
    pub fn is_dirty(&self, property: &str) -> bool {
        self.is_changed(property) || self.is_adjusted(property)
    }

    /// The pending delta of an adjusted property.
    #[must_use]
    pub fn adjustment(&self, property: &str) -> Option<&Value> {
        self.adjusted.get(property)
    }

    pub fn changed(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changed.iter().copied()
    }

    pub fn adjusted(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.adjusted.iter().map(|(name, delta)| (*name, delta))
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.adjusted.is_empty()
    }

    /// Forgets every pending change.
    pub fn clear(&mut self) {
        self.changed.clear();
        self.adjusted.clear();
    }
}
