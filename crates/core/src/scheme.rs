// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Declarative property schemes.
//!
//! Each entity type owns one [`PropertyScheme`]: an ordered table of
//! [`PropertyDescriptor`]s describing how a logical property maps to its
//! storage column and which hooks replace the default access paths.
//!
//! Hooks are plain function pointers, so a scheme is immutable data that
//! can live in a `static`.

use std::collections::HashMap;

use crate::error::RowError;
use crate::materialize::FieldSet;
use crate::store::RawRow;
use crate::value::Value;

/// Pure conversion between the stored and the in-memory representation.
pub type Conversion = fn(Value) -> Value;
/// Reads a property from an entity.
pub type Getter<E> = fn(&E) -> Value;
/// Writes a property into an entity.
pub type Setter<E> = fn(&mut E, Value) -> Result<(), RowError>;
/// Populates one or more properties from the whole raw row.
pub type Extractor<E> = fn(&mut E, &RawRow) -> Result<(), RowError>;
/// Emits one or more storage fields directly.
pub type Injector<E> = fn(&E, &mut FieldSet);
/// Per-instance transform applied to a value on its way to storage.
pub type OutputMethod<E> = fn(&E, Value) -> Value;

/// Direct access to the entity field backing a property.
pub struct Slot<E> {
    read: Getter<E>,
    write: Setter<E>,
}

impl<E> Slot<E> {
    pub(crate) fn read(&self, entity: &E) -> Value {
        (self.read)(entity)
    }

    pub(crate) fn write(&self, entity: &mut E, value: Value) -> Result<(), RowError> {
        (self.write)(entity, value)
    }
}

/// Description of a single logical property.
pub struct PropertyDescriptor<E> {
    name: &'static str,
    storage_field: Option<&'static str>,
    read_only: bool,
    numeric: bool,
    linked_fields: Vec<&'static str>,
    input: Option<Conversion>,
    output: Option<Conversion>,
    getter: Option<Getter<E>>,
    setter: Option<Setter<E>>,
    extract: Option<Extractor<E>>,
    inject: Option<Injector<E>>,
    output_method: Option<OutputMethod<E>>,
    slot: Option<Slot<E>>,
}

impl<E> PropertyDescriptor<E> {
    /// Starts a descriptor for the logical property `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            storage_field: None,
            read_only: false,
            numeric: false,
            linked_fields: Vec::new(),
            input: None,
            output: None,
            getter: None,
            setter: None,
            extract: None,
            inject: None,
            output_method: None,
            slot: None,
        }
    }

    /// Maps the property to a storage column.
    #[must_use]
    pub fn field(mut self, storage_field: &'static str) -> Self {
        self.storage_field = Some(storage_field);
        self
    }

    /// Marks the property read-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the property numeric, which allows delta adjustments.
    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// Declares further storage fields affected by this property.
    #[must_use]
    pub fn linked(mut self, fields: &[&'static str]) -> Self {
        for field in fields {
            if !self.linked_fields.contains(field) {
                self.linked_fields.push(*field);
            }
        }
        self
    }

    /// Conversion applied to the raw stored value on load.
    #[must_use]
    pub fn input(mut self, conversion: Conversion) -> Self {
        self.input = Some(conversion);
        self
    }

    /// Conversion applied to the property value on save.
    #[must_use]
    pub fn output(mut self, conversion: Conversion) -> Self {
        self.output = Some(conversion);
        self
    }

    /// Custom getter replacing direct slot access.
    #[must_use]
    pub fn getter(mut self, getter: Getter<E>) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Custom setter replacing direct slot access.
    #[must_use]
    pub fn setter(mut self, setter: Setter<E>) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Extractor reading the whole raw row on load.
    #[must_use]
    pub fn extract(mut self, extractor: Extractor<E>) -> Self {
        self.extract = Some(extractor);
        self
    }

    /// Injector writing storage fields directly on save.
    #[must_use]
    pub fn inject(mut self, injector: Injector<E>) -> Self {
        self.inject = Some(injector);
        self
    }

    /// Per-instance output transform, applied after the output conversion.
    #[must_use]
    pub fn output_method(mut self, method: OutputMethod<E>) -> Self {
        self.output_method = Some(method);
        self
    }

    /// The entity field backing this property.
    #[must_use]
    pub fn slot(mut self, read: Getter<E>, write: Setter<E>) -> Self {
        self.slot = Some(Slot { read, write });
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn storage_field(&self) -> Option<&'static str> {
        self.storage_field
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.numeric
    }

    /// A virtual property has no storage field of its own.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.storage_field.is_none()
    }

    #[must_use]
    pub fn linked_fields(&self) -> &[&'static str] {
        &self.linked_fields
    }

    /// Returns true if changing this property affects `field`.
    #[must_use]
    pub fn touches_field(&self, field: &str) -> bool {
        self.storage_field == Some(field) || self.linked_fields.iter().any(|linked| *linked == field)
    }

    pub(crate) const fn input_conversion(&self) -> Option<Conversion> {
        self.input
    }

    pub(crate) const fn output_conversion(&self) -> Option<Conversion> {
        self.output
    }

    pub(crate) const fn custom_getter(&self) -> Option<Getter<E>> {
        self.getter
    }

    pub(crate) const fn custom_setter(&self) -> Option<Setter<E>> {
        self.setter
    }

    pub(crate) const fn extractor(&self) -> Option<Extractor<E>> {
        self.extract
    }

    pub(crate) const fn injector(&self) -> Option<Injector<E>> {
        self.inject
    }

    pub(crate) const fn custom_output(&self) -> Option<OutputMethod<E>> {
        self.output_method
    }

    pub(crate) const fn storage_slot(&self) -> Option<&Slot<E>> {
        self.slot.as_ref()
    }
}

/// The ordered property table of one entity type.
pub struct PropertyScheme<E> {
    properties: Vec<PropertyDescriptor<E>>,
    index: HashMap<&'static str, usize>,
}

impl<E> PropertyScheme<E> {
    /// Builds a scheme from its descriptors, in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if two descriptors share a name, or if a writable property
    /// with a storage field has neither a slot nor a setter. Schemes are
    /// static definitions, so either case is a programming error.
    #[must_use]
    pub fn new(properties: Vec<PropertyDescriptor<E>>) -> Self {
        let mut index = HashMap::with_capacity(properties.len());
        for (position, property) in properties.iter().enumerate() {
            let previous = index.insert(property.name, position);
            assert!(
                previous.is_none(),
                "property '{}' is declared more than once",
                property.name
            );
            assert!(
                property.read_only
                    || property.storage_field.is_none()
                    || property.slot.is_some()
                    || property.setter.is_some(),
                "property '{}' is stored but has no slot or setter",
                property.name
            );
        }
        Self { properties, index }
    }

    /// Looks up a property by logical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor<E>> {
        self.index.get(name).map(|&position| &self.properties[position])
    }

    /// Returns true if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor<E>> {
        self.properties.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Every column the scheme reads: the id field, then storage and linked
    /// fields in declaration order, without duplicates.
    #[must_use]
    pub fn columns(&self, id_field: &str) -> Vec<String> {
        let mut columns: Vec<String> = vec![id_field.to_string()];
        let fields = self.properties.iter().flat_map(|property| {
            property
                .storage_field
                .into_iter()
                .chain(property.linked_fields.iter().copied())
        });
        for field in fields {
            if !columns.iter().any(|column| column == field) {
                columns.push(field.to_string());
            }
        }
        columns
    }
}
