// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turns an entity's scheme and tracked changes into statements.
//!
//! All statements are single-row and keyed by primary id. Identifiers are
//! quoted with backticks, which both `SQLite` and `MySQL` accept; values are
//! always bound as parameters.

use crate::codec;
use crate::dispatch;
use crate::entity::Entity;
use crate::store::{Select, Statement};
use crate::value::Value;

/// One storage field's outgoing value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    value: Value,
    delta: bool,
}

impl FieldValue {
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// True if the value is a pending delta rather than a replacement.
    #[must_use]
    pub const fn is_delta(&self) -> bool {
        self.delta
    }
}

/// Ordered storage-field → value mapping.
///
/// Inserting an existing field replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, FieldValue)>,
}

impl FieldSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to a plain value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.put(field.into(), value.into(), false);
    }

    /// Sets `field` to a delta to be added to the stored value.
    pub fn insert_delta(&mut self, field: impl Into<String>, delta: impl Into<Value>) {
        self.put(field.into(), delta.into(), true);
    }

    fn put(&mut self, field: String, value: Value, delta: bool) {
        let entry = FieldValue { value, delta };
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((field, entry)),
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Quotes an identifier with backticks.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Builds the field set of an entity in scheme order.
///
/// For updates, adjusted properties contribute their pending delta instead
/// of their live value.
pub(crate) fn field_set<E: Entity>(entity: &E, for_update: bool) -> FieldSet {
    let tracker = entity.row_state().tracker();
    let mut fields = FieldSet::new();

    for property in E::scheme().iter() {
        if let Some(injector) = property.injector() {
            injector(entity, &mut fields);
            continue;
        }
        let Some(field) = property.storage_field() else {
            continue;
        };
        if property.is_read_only() {
            continue;
        }

        let pending = if for_update {
            tracker.adjustment(property.name())
        } else {
            None
        };
        match pending {
            Some(delta) => {
                let delta = codec::encode(entity, property, delta.clone());
                fields.insert_delta(field, delta);
            }
            None => {
                let value = codec::encode(entity, property, dispatch::read(entity, property));
                fields.insert(field, value);
            }
        }
    }

    fields
}

/// True if some changed or adjusted property maps to `field`, directly or
/// through its linked fields.
pub(crate) fn is_field_dirty<E: Entity>(entity: &E, field: &str) -> bool {
    let tracker = entity.row_state().tracker();
    let scheme = E::scheme();
    tracker
        .changed()
        .chain(tracker.adjusted().map(|(name, _)| name))
        .filter_map(|name| scheme.get(name))
        .any(|property| property.touches_field(field))
}

/// `INSERT` over the whole field set.
pub(crate) fn insert_statement<E: Entity>(fields: &FieldSet) -> Statement {
    let table = quote_ident(E::TABLE);
    if fields.is_empty() {
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES (NULL)",
            quote_ident(E::ID_FIELD)
        );
        return Statement::new(sql, Vec::new());
    }

    let columns: Vec<String> = fields.fields().map(quote_ident).collect();
    let placeholders: Vec<&str> = vec!["?"; fields.len()];
    let params: Vec<Value> = fields.iter().map(|(_, v)| v.value().clone()).collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    Statement::new(sql, params)
}

/// `UPDATE` restricted to dirty fields, or `None` when nothing qualifies.
pub(crate) fn update_statement<E: Entity>(entity: &E, fields: &FieldSet) -> Option<Statement> {
    let mut assignments: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    for (field, value) in fields.iter() {
        if !is_field_dirty(entity, field) {
            continue;
        }
        let column = quote_ident(field);
        if value.is_delta() {
            // parenthesized so a negative delta stays unambiguous
            assignments.push(format!("{column} = {column} + (?)"));
        } else {
            assignments.push(format!("{column} = ?"));
        }
        params.push(value.value().clone());
    }

    if assignments.is_empty() {
        return None;
    }

    params.push(Value::Int(entity.id()));
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quote_ident(E::TABLE),
        assignments.join(", "),
        quote_ident(E::ID_FIELD)
    );
    Some(Statement::new(sql, params))
}

/// `DELETE` by primary id.
pub(crate) fn delete_statement<E: Entity>(id: i64) -> Statement {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        quote_ident(E::TABLE),
        quote_ident(E::ID_FIELD)
    );
    Statement::new(sql, vec![Value::Int(id)])
}

/// Single-row `SELECT` of every scheme column by primary id.
pub(crate) fn select_statement<E: Entity>(id: i64) -> Select {
    let columns = E::scheme().columns(E::ID_FIELD);
    let projection: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
        projection.join(", "),
        quote_ident(E::TABLE),
        quote_ident(E::ID_FIELD)
    );
    Select::new(Statement::new(sql, vec![Value::Int(id)]), columns)
}
