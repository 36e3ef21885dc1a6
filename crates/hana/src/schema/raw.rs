// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::ObjectSchema;
use crate::error::{Error, Result};
use crate::typespec::PropertySink;
use crate::value::{PropertyValue, Value};
use std::sync::Arc;

/// Field bag with one slot per property, in declaration order.
///
/// Slots start at the property's initial value. Builders and decoders fill
/// it before an instance is materialized.
#[derive(Debug, Clone)]
pub struct RawData {
    schema: Arc<ObjectSchema>,
    values: Vec<PropertyValue>,
}

impl RawData {
    pub fn new(schema: Arc<ObjectSchema>) -> Self {
        let values = schema
            .properties()
            .iter()
            .map(|p| p.type_spec().initial_value())
            .collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    pub fn get(&self, index: usize) -> Option<&PropertyValue> {
        self.values.get(index)
    }

    /// Value of the property called `name`.
    pub fn by_name(&self, name: &str) -> Result<&PropertyValue> {
        let index = self.schema.require(name)?;
        Ok(&self.values[index])
    }

    /// Replace a whole slot.
    pub fn replace(&mut self, index: usize, value: PropertyValue) -> Result<PropertyValue> {
        let slot = self.slot_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn values(&self) -> &[PropertyValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<PropertyValue> {
        self.values
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Result<&mut PropertyValue> {
        let schema = self.schema.name();
        self.values.get_mut(index).ok_or_else(|| {
            Error::Decode(format!("property index {} out of range for '{}'", index, schema))
        })
    }
}

fn wrong_shape(expected: &str, found: &PropertyValue) -> Error {
    Error::KindMismatch {
        expected: expected.to_string(),
        found: found.shape_name().to_string(),
    }
}

impl PropertySink for RawData {
    fn set_value(&mut self, index: usize, value: Option<Value>) -> Result<()> {
        match self.slot_mut(index)? {
            PropertyValue::Single(slot) => {
                *slot = value;
                Ok(())
            }
            other => Err(wrong_shape("single value", other)),
        }
    }

    fn push_value(&mut self, index: usize, value: Value) -> Result<()> {
        match self.slot_mut(index)? {
            PropertyValue::List(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(wrong_shape("list", other)),
        }
    }

    fn put_entry(&mut self, index: usize, key: Value, value: Value) -> Result<()> {
        match self.slot_mut(index)? {
            PropertyValue::Map(map) => {
                map.insert(key, value);
                Ok(())
            }
            other => Err(wrong_shape("map", other)),
        }
    }
}
