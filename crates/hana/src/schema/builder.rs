// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent object builder.

use super::{HanaObject, ObjectSchema, RawData};
use crate::error::{Error, Result};
use crate::extension::ExtensionRegistry;
use crate::typespec::{AccessorKind, PropertySink, TypeSpec};
use crate::value::{PropertyValue, Value};
use std::sync::Arc;

/// Name-addressed builder over a [`RawData`] holder.
///
/// Each mutator checks that the property's shape exposes the matching
/// accessor (`set` on a list property is an error, as is `add` on a
/// single-valued one).
pub struct ObjectBuilder {
    raw: RawData,
    extensions: Arc<ExtensionRegistry>,
}

impl ObjectBuilder {
    pub fn new(schema: Arc<ObjectSchema>, extensions: Arc<ExtensionRegistry>) -> Self {
        Self {
            raw: RawData::new(schema),
            extensions,
        }
    }

    /// Builder over an already filled holder.
    pub fn from_raw(raw: RawData, extensions: Arc<ExtensionRegistry>) -> Self {
        Self { raw, extensions }
    }

    pub fn schema(&self) -> &Arc<ObjectSchema> {
        self.raw.schema()
    }

    pub fn extensions(&self) -> &Arc<ExtensionRegistry> {
        &self.extensions
    }

    pub fn raw(&self) -> &RawData {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut RawData {
        &mut self.raw
    }

    fn resolve(&self, name: &str, accessor: AccessorKind) -> Result<(usize, TypeSpec)> {
        let schema = self.raw.schema();
        let index = schema.require(name)?;
        let spec = schema.properties()[index].type_spec();
        if !spec.supports_accessor(accessor) {
            return Err(Error::UnsupportedAccessor {
                property: name.to_string(),
                accessor: accessor.method_name(name),
            });
        }
        Ok((index, spec.clone()))
    }

    /// `setX`: store a single value. Plain values on `Wrapped` properties
    /// are stored as `Direct`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let (index, spec) = self.resolve(name, AccessorKind::Set)?;
        let value = spec.prepare(value.into())?;
        self.raw.set_value(index, Some(value))?;
        Ok(self)
    }

    /// `setX` with a possibly absent value.
    pub fn set_optional(&mut self, name: &str, value: Option<Value>) -> Result<&mut Self> {
        let (index, spec) = self.resolve(name, AccessorKind::Set)?;
        let value = value.map(|v| spec.prepare(v)).transpose()?;
        self.raw.set_value(index, value)?;
        Ok(self)
    }

    /// `getX`: the value currently held.
    pub fn get(&self, name: &str) -> Result<&PropertyValue> {
        self.resolve(name, AccessorKind::Get)?;
        self.raw.by_name(name)
    }

    /// `addX`: append every item, in order.
    pub fn add<I, V>(&mut self, name: &str, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let (index, spec) = self.resolve(name, AccessorKind::Add)?;
        for item in items {
            let value = spec.prepare(item.into())?;
            self.raw.push_value(index, value)?;
        }
        Ok(self)
    }

    /// `clearX`: back to the empty collection.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self> {
        let (index, spec) = self.resolve(name, AccessorKind::Clear)?;
        self.raw.replace(index, spec.initial_value())?;
        Ok(self)
    }

    /// `putX`: insert or replace one map entry.
    pub fn put(&mut self, name: &str, key: impl Into<Value>, value: impl Into<Value>) -> Result<&mut Self> {
        let (index, spec) = self.resolve(name, AccessorKind::Put)?;
        let key = spec.prepare_key(key.into())?;
        let value = spec.prepare(value.into())?;
        self.raw.put_entry(index, key, value)?;
        Ok(self)
    }

    /// `deleteX`: remove one map entry, if present.
    pub fn delete(&mut self, name: &str, key: impl Into<Value>) -> Result<&mut Self> {
        let (index, _) = self.resolve(name, AccessorKind::Delete)?;
        if let PropertyValue::Map(map) = self.raw.slot_mut(index)? {
            map.remove(&key.into());
        }
        Ok(self)
    }

    /// Materialize the instance and run its validator.
    ///
    /// Late-deserializable instances are validated after population instead.
    pub fn build(self) -> Result<Arc<HanaObject>> {
        let object = HanaObject::from_raw(self.raw, self.extensions);
        if !object.schema().is_late_deserializable() {
            object.validate()?;
        }
        Ok(object)
    }
}

impl PropertySink for ObjectBuilder {
    fn set_value(&mut self, index: usize, value: Option<Value>) -> Result<()> {
        self.raw.set_value(index, value)
    }

    fn push_value(&mut self, index: usize, value: Value) -> Result<()> {
        self.raw.push_value(index, value)
    }

    fn put_entry(&mut self, index: usize, key: Value, value: Value) -> Result<()> {
        self.raw.put_entry(index, key, value)
    }
}

/// Produces the builder used for one schema, e.g. one with preset defaults.
pub trait BuilderFactory: Send + Sync {
    fn create(
        &self,
        schema: &Arc<ObjectSchema>,
        extensions: &Arc<ExtensionRegistry>,
    ) -> Result<ObjectBuilder>;
}

impl<F> BuilderFactory for F
where
    F: Fn(&Arc<ObjectSchema>, &Arc<ExtensionRegistry>) -> Result<ObjectBuilder> + Send + Sync,
{
    fn create(
        &self,
        schema: &Arc<ObjectSchema>,
        extensions: &Arc<ExtensionRegistry>,
    ) -> Result<ObjectBuilder> {
        self(schema, extensions)
    }
}
