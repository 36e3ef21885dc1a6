// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary and readable codecs
//!
//! Both codecs share one [`CodecRegistry`] mapping type ids and type names
//! to either a terminal plugin or a schema. Each serializer/deserializer
//! owns a per-call identity table: the first occurrence of a schema object
//! gets a fresh surrogate id, later occurrences are written as lookups.
//!
//! # Module Organization
//!
//! - [`binary`] - CBOR units keyed by small integer tags
//! - [`readable`] - JSON nodes keyed by type alias
//! - `primitives` - built-in terminal plugins (NOT auto-exported)
//!
//! # Wire shape
//!
//! ```text
//! binary unit  : { 1: type id, 2: payload, 3: surrogate id (objects, first occurrence) }
//! object body  : { property id: packed value, ..., -1: [extension units] }
//! lookup unit  : { 1: 10001, 2: surrogate id }
//!
//! readable node: { "type": alias, ... }
//! object node  : { "type", "children": [{ "func": property, ... }], "extensions", "id" }
//! lookup node  : { "type": "__lookup__", "id": surrogate id }
//! ```
//!
//! Identities are registered before an object's content is written, so a
//! cyclic graph encodes in finite space. Decoding registers an object once it
//! is built, so a cycle through fixed properties does not decode
//! ([`Error::UnknownLookup`](crate::Error::UnknownLookup)).

pub mod binary;
mod primitives;
pub mod readable;

#[cfg(test)]
mod tests;

pub use binary::{BinaryDeserializer, BinarySerializer};
pub use primitives::builtin_plugins;
pub use readable::{ReadableDeserializer, ReadableSerializer};

use crate::config::{TYPE_ID_LOOKUP, TYPE_ID_MAP_ENTRY, TYPE_NAME_LOOKUP, TYPE_NAME_MAP_ENTRY};
use crate::error::{Error, Result};
use crate::schema::ObjectSchema;
use crate::value::{Value, ValueClass};
use ciborium::value::Value as Cbor;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;
use std::sync::Arc;

/// Readable node fields other than `type`.
pub type NodeFields = Map<String, Json>;

/// Pack/unpack pair for one terminal value type.
pub trait TerminalPlugin: Send + Sync {
    /// Binary type id.
    fn type_id(&self) -> i32;

    /// Readable type alias.
    fn type_name(&self) -> &str;

    /// Class of the values this plugin writes.
    fn value_class(&self) -> ValueClass;

    /// Binary payload of `value`.
    fn pack(&self, value: &Value, ser: &mut BinarySerializer<'_>) -> Result<Cbor>;

    fn unpack(&self, payload: &Cbor, de: &mut BinaryDeserializer<'_>) -> Result<Value>;

    /// Readable fields of `value`; the serializer adds `type`.
    fn to_node(&self, value: &Value, ser: &mut ReadableSerializer<'_>) -> Result<NodeFields>;

    fn from_node(&self, node: &NodeFields, de: &mut ReadableDeserializer<'_>) -> Result<Value>;
}

/// What a type id or type name resolves to.
#[derive(Clone)]
pub enum CodecEntry {
    Terminal(Arc<dyn TerminalPlugin>),
    Schema(Arc<ObjectSchema>),
}

/// Type-id, type-name and value-class tables shared by both codecs.
///
/// Filled once at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    by_type_id: HashMap<i32, CodecEntry>,
    by_name: HashMap<String, CodecEntry>,
    by_class: HashMap<ValueClass, Arc<dyn TerminalPlugin>>,
    schemas: Vec<Arc<ObjectSchema>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in terminal plugin.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for plugin in builtin_plugins() {
            registry.register_plugin(plugin)?;
        }
        Ok(registry)
    }

    fn claim(&self, type_id: i32, names: &[String]) -> Result<()> {
        if type_id == TYPE_ID_LOOKUP
            || type_id == TYPE_ID_MAP_ENTRY
            || self.by_type_id.contains_key(&type_id)
        {
            return Err(Error::DuplicateTypeId(type_id));
        }
        for name in names {
            if name == TYPE_NAME_LOOKUP || name == TYPE_NAME_MAP_ENTRY || self.by_name.contains_key(name) {
                return Err(Error::DuplicateTypeName(name.clone()));
            }
        }
        Ok(())
    }

    pub fn register_plugin(&mut self, plugin: Arc<dyn TerminalPlugin>) -> Result<()> {
        let name = plugin.type_name().to_string();
        self.claim(plugin.type_id(), std::slice::from_ref(&name))?;
        log::trace!("[codec] plugin '{}' ({})", name, plugin.type_id());
        let entry = CodecEntry::Terminal(Arc::clone(&plugin));
        self.by_type_id.insert(plugin.type_id(), entry.clone());
        self.by_name.insert(name, entry);
        self.by_class.insert(plugin.value_class(), plugin);
        Ok(())
    }

    /// Register a schema under its type id and every alias.
    pub fn register_schema(&mut self, schema: Arc<ObjectSchema>) -> Result<()> {
        self.claim(schema.type_id(), schema.type_names())?;
        let entry = CodecEntry::Schema(Arc::clone(&schema));
        self.by_type_id.insert(schema.type_id(), entry.clone());
        for name in schema.type_names() {
            self.by_name.insert(name.clone(), entry.clone());
        }
        self.schemas.push(schema);
        Ok(())
    }

    pub fn by_type_id(&self, type_id: i32) -> Option<&CodecEntry> {
        self.by_type_id.get(&type_id)
    }

    pub fn by_name(&self, name: &str) -> Option<&CodecEntry> {
        self.by_name.get(name)
    }

    pub fn schema_by_id(&self, type_id: i32) -> Option<&Arc<ObjectSchema>> {
        match self.by_type_id.get(&type_id) {
            Some(CodecEntry::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    pub fn schema_by_name(&self, name: &str) -> Option<&Arc<ObjectSchema>> {
        match self.by_name.get(name) {
            Some(CodecEntry::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    /// Registered schemas in registration order.
    pub fn schemas(&self) -> &[Arc<ObjectSchema>] {
        &self.schemas
    }

    /// Plugin writing a plain (non-object) value.
    pub fn plugin_for(&self, value: &Value) -> Result<&Arc<dyn TerminalPlugin>> {
        let class = value.class();
        self.by_class
            .get(&class)
            .ok_or_else(|| Error::NoPlugin(class.to_string()))
    }
}
