// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::{
    Diagnostics, Entity, Inconsistency, PropertyDescriptor, PropertyScheme, RawRow, RowError,
    RowState, RowStore, Select, Statement, Value,
};

/// In-memory store that records every statement it is given.
///
/// It does not interpret SQL: fetches are answered from `rows` by the bound
/// id and inserts hand out sequential ids.
#[derive(Default)]
pub struct RecordingStore {
    pub executed: Vec<Statement>,
    pub selects: Vec<Select>,
    pub rows: HashMap<i64, RawRow>,
    pub locks: Vec<(String, i64)>,
    pub next_id: i64,
    pub last_id: i64,
    pub transaction_open: bool,
    pub reject_statements: bool,
    pub withhold_ids: bool,
    reports: RefCell<Vec<(String, Inconsistency)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            transaction_open: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<Inconsistency> {
        self.reports
            .borrow()
            .iter()
            .map(|(_, inconsistency)| inconsistency.clone())
            .collect()
    }

    pub fn report_tables(&self) -> Vec<String> {
        self.reports
            .borrow()
            .iter()
            .map(|(table, _)| table.clone())
            .collect()
    }

    pub fn last_sql(&self) -> Option<&str> {
        self.executed.last().map(Statement::sql)
    }
}

impl Diagnostics for RecordingStore {
    fn report(&self, table: &str, inconsistency: &Inconsistency) {
        self.reports
            .borrow_mut()
            .push((table.to_string(), inconsistency.clone()));
    }
}

impl RowStore for RecordingStore {
    fn execute(&mut self, statement: &Statement) -> Result<usize, RowError> {
        if self.reject_statements {
            return Err(RowError::Storage("statement rejected".into()));
        }
        self.executed.push(statement.clone());
        if statement.sql().starts_with("INSERT") {
            self.last_id = if self.withhold_ids { 0 } else { self.next_id };
            self.next_id += 1;
        }
        Ok(1)
    }

    fn fetch_one(&mut self, select: &Select) -> Result<Option<RawRow>, RowError> {
        self.selects.push(select.clone());
        let id = select
            .statement()
            .params()
            .first()
            .and_then(Value::as_i64)
            .unwrap_or_default();
        Ok(self.rows.get(&id).cloned())
    }

    fn last_inserted_id(&mut self) -> Result<i64, RowError> {
        Ok(self.last_id)
    }

    fn acquire_row_lock(&mut self, table: &str, _id_field: &str, id: i64) -> Result<(), RowError> {
        self.locks.push((table.to_string(), id));
        Ok(())
    }

    fn is_transaction_open(&mut self) -> bool {
        self.transaction_open
    }

    fn diagnostics(&self) -> &dyn Diagnostics {
        self
    }
}

// ============================================================================
// Stock: plain fields, a read-only field, conversions and a virtual property
// ============================================================================

#[derive(Debug, Default)]
pub struct Stock {
    row: RowState,
    pub quantity: i64,
    pub name: String,
    pub kind: i64,
    pub price: f64,
    pub note: Option<String>,
}

type StockProperty = PropertyDescriptor<Stock>;

fn cents_to_price(raw: Value) -> Value {
    match raw {
        Value::Int(cents) => Value::Float(cents as f64 / 100.0),
        other => other,
    }
}

fn price_to_cents(value: Value) -> Value {
    match value {
        Value::Float(price) => Value::Int((price * 100.0).round() as i64),
        other => other,
    }
}

static STOCK_SCHEME: LazyLock<PropertyScheme<Stock>> = LazyLock::new(|| {
    PropertyScheme::new(vec![
        StockProperty::new("quantity")
            .field("qty")
            .numeric()
            .slot(
                |stock| stock.quantity.into(),
                |stock, value| {
                    stock.quantity = value.decode("quantity")?;
                    Ok(())
                },
            ),
        StockProperty::new("name").field("name").slot(
            |stock| stock.name.clone().into(),
            |stock, value| {
                stock.name = value.decode::<Option<String>>("name")?.unwrap_or_default();
                Ok(())
            },
        ),
        StockProperty::new("kind").field("kind").read_only().slot(
            |stock| stock.kind.into(),
            |stock, value| {
                stock.kind = value.decode("kind")?;
                Ok(())
            },
        ),
        StockProperty::new("price")
            .field("price_cents")
            .numeric()
            .input(cents_to_price)
            .output(price_to_cents)
            .slot(
                |stock| stock.price.into(),
                |stock, value| {
                    stock.price = value.decode::<Option<f64>>("price")?.unwrap_or_default();
                    Ok(())
                },
            ),
        StockProperty::new("note")
            .field("note")
            .output_method(|_, value| match value {
                Value::Text(text) => Value::Text(text.trim().to_string()),
                other => other,
            })
            .slot(
                |stock| stock.note.clone().into(),
                |stock, value| {
                    stock.note = value.decode("note")?;
                    Ok(())
                },
            ),
        StockProperty::new("label")
            .linked(&["name"])
            .getter(|stock| format!("{} x{}", stock.name, stock.quantity).into())
            .setter(|stock, value| {
                stock.name = value.decode("label")?;
                Ok(())
            }),
    ])
});

impl Entity for Stock {
    const TABLE: &'static str = "stock";
    const ID_FIELD: &'static str = "stock_id";

    fn scheme() -> &'static PropertyScheme<Self> {
        &STOCK_SCHEME
    }

    fn row_state(&self) -> &RowState {
        &self.row
    }

    fn row_state_mut(&mut self) -> &mut RowState {
        &mut self.row
    }

    fn is_empty(&self) -> bool {
        self.quantity <= 0
    }
}

pub fn stock_row(id: i64, qty: i64, name: &str) -> RawRow {
    [
        ("stock_id", Value::Int(id)),
        ("qty", Value::Int(qty)),
        ("name", Value::from(name)),
        ("kind", Value::Int(7)),
        ("price_cents", Value::Int(1250)),
        ("note", Value::Null),
    ]
    .into_iter()
    .collect()
}

/// A stock row that was loaded from the recording store.
pub fn loaded_stock(store: &mut RecordingStore, id: i64, qty: i64) -> Stock {
    store.rows.insert(id, stock_row(id, qty, "bolts"));
    let mut stock = Stock::default();
    let found = stock.load(store, id, false).expect("load succeeds");
    assert!(found);
    stock
}

// ============================================================================
// Placement: one property spread over two fields via extract/inject
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub kind: i64,
    pub id: i64,
}

#[derive(Debug, Default)]
pub struct Placement {
    row: RowState,
    pub owner: i64,
    pub location: Location,
}

type PlacementProperty = PropertyDescriptor<Placement>;

fn parse_location(value: &Value) -> Option<Location> {
    let (kind, id) = value.as_str()?.split_once(':')?;
    Some(Location {
        kind: kind.parse().ok()?,
        id: id.parse().ok()?,
    })
}

static PLACEMENT_SCHEME: LazyLock<PropertyScheme<Placement>> = LazyLock::new(|| {
    PropertyScheme::new(vec![
        PlacementProperty::new("owner").field("owner_id").slot(
            |placement| placement.owner.into(),
            |placement, value| {
                placement.owner = value.decode("owner")?;
                Ok(())
            },
        ),
        PlacementProperty::new("location")
            .linked(&["location_type", "location_id"])
            .getter(|placement| {
                format!("{}:{}", placement.location.kind, placement.location.id).into()
            })
            .setter(|placement, value| {
                placement.location = parse_location(&value).ok_or(RowError::TypeMismatch {
                    property: String::from("location"),
                    expected: "kind:id",
                    found: value.kind(),
                })?;
                Ok(())
            })
            .extract(|placement, row| {
                placement.location = Location {
                    kind: row.value("location_type").decode("location")?,
                    id: row.value("location_id").decode("location")?,
                };
                Ok(())
            })
            .inject(|placement, fields| {
                fields.insert("location_type", placement.location.kind);
                fields.insert("location_id", placement.location.id);
            }),
    ])
});

impl Entity for Placement {
    const TABLE: &'static str = "placement";

    fn scheme() -> &'static PropertyScheme<Self> {
        &PLACEMENT_SCHEME
    }

    fn row_state(&self) -> &RowState {
        &self.row
    }

    fn row_state_mut(&mut self) -> &mut RowState {
        &mut self.row
    }

    fn is_empty(&self) -> bool {
        self.owner == 0
    }
}
