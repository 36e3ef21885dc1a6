// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema object instances.

use super::{ObjectSchema, RawData};
use crate::changeprop::Variable;
use crate::error::{Error, Result};
use crate::extension::{
    CapabilityKey, ExtensibleType, ExtensionInstance, ExtensionManager, ExtensionRegistry,
    Validator,
};
use crate::typespec::AccessorKind;
use crate::value::{PropertyValue, Value, ValueMap};
use std::any::Any;
use std::fmt;
use std::mem::discriminant;
use std::sync::Arc;

/// Storage of one property.
pub enum Slot {
    /// Fixed at build time.
    Fixed(PropertyValue),
    /// Mutable, version-tracked.
    Variable(Arc<Variable<PropertyValue>>),
}

impl Slot {
    /// Snapshot of the current value.
    pub fn current(&self) -> PropertyValue {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Variable(var) => var.value(),
        }
    }
}

/// Instance of a schema type: one slot per property plus its extension cache.
pub struct HanaObject {
    schema: Arc<ObjectSchema>,
    slots: Vec<Slot>,
    extensions: ExtensionManager,
}

impl HanaObject {
    /// Wrap `Variable` properties into live variables and copy the rest.
    pub(crate) fn from_raw(raw: RawData, registry: Arc<ExtensionRegistry>) -> Arc<Self> {
        let schema = Arc::clone(raw.schema());
        let slots = schema
            .properties()
            .iter()
            .zip(raw.into_values())
            .map(|(spec, value)| {
                if spec.type_spec().is_variable() {
                    Slot::Variable(Arc::new(Variable::new(value)))
                } else {
                    Slot::Fixed(value)
                }
            })
            .collect();

        // Undeclared schema types resolve through their declared supertype.
        let own = schema.extensible_type();
        let extensible_type = if registry.is_declared(&own) {
            own
        } else {
            schema.supertype().clone()
        };

        Arc::new(Self {
            schema,
            slots,
            extensions: ExtensionManager::new(extensible_type, registry),
        })
    }

    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Current value of the property at `index`.
    pub fn property_at(&self, index: usize) -> Option<PropertyValue> {
        self.slots.get(index).map(Slot::current)
    }

    /// Current value of the property called `name`.
    pub fn property(&self, name: &str) -> Result<PropertyValue> {
        let index = self.schema.require(name)?;
        Ok(self.slots[index].current())
    }

    /// Single value of a `Terminal`, `Wrapped` or `Optional` property.
    pub fn value(&self, name: &str) -> Result<Option<Value>> {
        match self.property(name)? {
            PropertyValue::Single(value) => Ok(value),
            other => Err(shape_error("single value", &other)),
        }
    }

    pub fn list(&self, name: &str) -> Result<Vec<Value>> {
        match self.property(name)? {
            PropertyValue::List(items) => Ok(items),
            other => Err(shape_error("list", &other)),
        }
    }

    pub fn map(&self, name: &str) -> Result<ValueMap> {
        match self.property(name)? {
            PropertyValue::Map(map) => Ok(map),
            other => Err(shape_error("map", &other)),
        }
    }

    /// Live variable behind a `Variable` property.
    pub fn variable(&self, name: &str) -> Result<Arc<Variable<PropertyValue>>> {
        let index = self.schema.require(name)?;
        match &self.slots[index] {
            Slot::Variable(var) => Ok(Arc::clone(var)),
            Slot::Fixed(_) => Err(Error::NotVariable {
                schema: self.schema.name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    /// Replace the single value of a `Variable` property.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let var = self.variable(name)?;
        let index = self.schema.require(name)?;
        let spec = self.schema.properties()[index].type_spec();
        if !spec.supports_accessor(AccessorKind::Set) {
            return Err(Error::UnsupportedAccessor {
                property: name.to_string(),
                accessor: AccessorKind::Set.method_name(name),
            });
        }
        let value = spec.prepare(value.into())?;
        var.set(PropertyValue::Single(Some(value)));
        Ok(())
    }

    /// Replace the whole value of a `Variable` property.
    pub fn set_property(&self, name: &str, value: PropertyValue) -> Result<()> {
        let var = self.variable(name)?;
        let index = self.schema.require(name)?;
        let initial = self.schema.properties()[index].type_spec().initial_value();
        if discriminant(&initial) != discriminant(&value) {
            return Err(Error::KindMismatch {
                expected: initial.shape_name().to_string(),
                found: value.shape_name().to_string(),
            });
        }
        var.set(value);
        Ok(())
    }

    /// Copy every slot of `raw` into this instance's variables.
    pub(crate) fn populate(&self, raw: RawData) -> Result<()> {
        for (index, value) in raw.into_values().into_iter().enumerate() {
            match self.slots.get(index) {
                Some(Slot::Variable(var)) => var.set(value),
                _ => {
                    let property = self
                        .schema
                        .property(index)
                        .map(|p| p.name().to_string())
                        .unwrap_or_default();
                    return Err(Error::NotVariable {
                        schema: self.schema.name().to_string(),
                        property,
                    });
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    pub fn extensible_type(&self) -> &ExtensibleType {
        self.extensions.extensible_type()
    }

    pub fn extension_registry(&self) -> &Arc<ExtensionRegistry> {
        self.extensions.registry()
    }

    pub fn supports_extension(&self, key: &CapabilityKey) -> bool {
        self.extensions.supports(key)
    }

    /// Whether `key` was already created. Never creates.
    pub fn has_extension(&self, key: &CapabilityKey) -> bool {
        self.extensions.has(key)
    }

    /// Capability `key`, created on first request.
    pub fn get_extension_instance(self: &Arc<Self>, key: &CapabilityKey) -> Result<ExtensionInstance> {
        self.extensions.get(self, key)
    }

    /// Native capability of type `T`.
    pub fn get_extension<T: Any + Send + Sync>(self: &Arc<Self>) -> Result<Arc<T>> {
        let key = CapabilityKey::of::<T>();
        self.get_extension_instance(&key)?
            .downcast::<T>()
            .ok_or_else(|| Error::ExtensionTypeMismatch(key.to_string()))
    }

    /// Schema-object capability keyed by its schema type id.
    pub fn get_object_extension(self: &Arc<Self>, type_id: i32) -> Result<Arc<HanaObject>> {
        let key = CapabilityKey::schema(type_id);
        self.get_extension_instance(&key)?
            .as_object()
            .cloned()
            .ok_or_else(|| Error::ExtensionTypeMismatch(key.to_string()))
    }

    /// Install `extension`, built elsewhere, as this instance's schema-object
    /// capability for its type id.
    pub(crate) fn adopt_object_extension(&self, extension: Arc<HanaObject>) -> Result<()> {
        let key = CapabilityKey::schema(ObjectSchema::type_id(extension.schema()));
        self.extensions.adopt(key, ExtensionInstance::Object(extension))
    }

    /// Created capabilities only, in creation order.
    pub fn extensions(&self) -> Vec<(CapabilityKey, ExtensionInstance)> {
        self.extensions.created()
    }

    /// Run the [`Validator`] capability if this instance's type supports it.
    pub fn validate(self: &Arc<Self>) -> Result<()> {
        if !self.supports_extension(&CapabilityKey::of::<Validator>()) {
            return Ok(());
        }
        let validator = self.get_extension::<Validator>()?;
        validator.validate(self)
    }
}

fn shape_error(expected: &str, found: &PropertyValue) -> Error {
    Error::KindMismatch {
        expected: expected.to_string(),
        found: found.shape_name().to_string(),
    }
}

impl fmt::Debug for HanaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HanaObject")
            .field("schema", &self.schema.name())
            .field("address", &(self as *const Self))
            .finish()
    }
}
