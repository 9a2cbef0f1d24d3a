// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod transaction_tests;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use dbrow::{
    Diagnostics, Entity, Inconsistency, PropertyDescriptor, PropertyScheme, RowState, Value,
};

use crate::Persistence;

const COUNTERS_DDL: &str = "CREATE TABLE counters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    label TEXT NOT NULL DEFAULT '',
    total INTEGER NOT NULL DEFAULT 0,
    ratio REAL
)";

/// A minimal entity: a labelled running total.
#[derive(Debug, Default)]
pub struct Counter {
    row: RowState,
    pub label: String,
    pub total: i64,
    pub ratio: Option<f64>,
}

type CounterProperty = PropertyDescriptor<Counter>;

static COUNTER_SCHEME: LazyLock<PropertyScheme<Counter>> = LazyLock::new(|| {
    PropertyScheme::new(vec![
        CounterProperty::new("label").field("label").slot(
            |counter| counter.label.clone().into(),
            |counter, value| {
                counter.label = value.decode("label")?;
                Ok(())
            },
        ),
        CounterProperty::new("total").field("total").numeric().slot(
            |counter| counter.total.into(),
            |counter, value| {
                counter.total = value.decode("total")?;
                Ok(())
            },
        ),
        CounterProperty::new("ratio").field("ratio").numeric().slot(
            |counter| counter.ratio.into(),
            |counter, value| {
                counter.ratio = value.decode("ratio")?;
                Ok(())
            },
        ),
    ])
});

impl Entity for Counter {
    const TABLE: &'static str = "counters";

    fn scheme() -> &'static PropertyScheme<Self> {
        &COUNTER_SCHEME
    }

    fn row_state(&self) -> &RowState {
        &self.row
    }

    fn row_state_mut(&mut self) -> &mut RowState {
        &mut self.row
    }

    fn is_empty(&self) -> bool {
        self.total <= 0
    }
}

/// Diagnostics sink that keeps every report for later assertions.
#[derive(Clone, Default)]
pub struct CollectingDiagnostics {
    reports: Rc<RefCell<Vec<Inconsistency>>>,
}

impl CollectingDiagnostics {
    pub fn reports(&self) -> Vec<Inconsistency> {
        self.reports.borrow().clone()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, _table: &str, inconsistency: &Inconsistency) {
        self.reports.borrow_mut().push(inconsistency.clone());
    }
}

/// An in-memory database with the `counters` table.
pub fn counter_store() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.execute_raw(COUNTERS_DDL).unwrap();
    persistence
}

/// Like [`counter_store`], with reports collected instead of logged.
pub fn observed_counter_store() -> (Persistence, CollectingDiagnostics) {
    let diagnostics = CollectingDiagnostics::default();
    let persistence = counter_store().with_diagnostics(Box::new(diagnostics.clone()));
    (persistence, diagnostics)
}

/// Inserts a counter with `total` and returns its id.
pub fn insert_counter(persistence: &mut Persistence, label: &str, total: i64) -> i64 {
    let mut counter = Counter::default();
    counter.set("label", label).unwrap();
    counter.set("total", total).unwrap();
    counter.insert(persistence).unwrap()
}

pub fn load_counter(persistence: &mut Persistence, id: i64) -> Option<Counter> {
    let mut counter = Counter::default();
    counter
        .load(persistence, id, false)
        .unwrap()
        .then_some(counter)
}

pub fn total_of(persistence: &mut Persistence, id: i64) -> Value {
    load_counter(persistence, id)
        .map(|counter| counter.get("total").unwrap())
        .unwrap_or_default()
}
