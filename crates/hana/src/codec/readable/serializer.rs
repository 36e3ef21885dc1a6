// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::codec::NodeFields;
use crate::config::{
    CodecOptions, FIELD_CHILDREN, FIELD_EXTENSIONS, FIELD_ID, FIELD_KEY, FIELD_TYPE, FIELD_VALUE,
    TYPE_NAME_LOOKUP, TYPE_NAME_MAP_ENTRY,
};
use crate::error::{Error, Result};
use crate::extension::ExtensionInstance;
use crate::runtime::Runtime;
use crate::schema::HanaObject;
use crate::value::Value;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Writes values as JSON nodes. One instance per encode call.
pub struct ReadableSerializer<'a> {
    runtime: &'a Runtime,
    options: CodecOptions,
    identities: HashMap<usize, Uuid>,
}

impl<'a> ReadableSerializer<'a> {
    pub fn new(runtime: &'a Runtime, options: CodecOptions) -> Self {
        Self {
            runtime,
            options,
            identities: HashMap::new(),
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode one value as a node.
    pub fn serialize(&mut self, value: &Value) -> Result<NodeFields> {
        match value {
            Value::Object(object) => self.serialize_object(object),
            other => {
                let plugin = Arc::clone(self.runtime.codecs().plugin_for(other)?);
                let mut node = NodeFields::new();
                node.insert(FIELD_TYPE.into(), Json::String(plugin.type_name().to_string()));
                node.extend(plugin.to_node(other, self)?);
                Ok(node)
            }
        }
    }

    fn serialize_object(&mut self, object: &Arc<HanaObject>) -> Result<NodeFields> {
        let address = Arc::as_ptr(object) as usize;
        let mut node = NodeFields::new();
        if let Some(id) = self.identities.get(&address) {
            node.insert(FIELD_TYPE.into(), Json::String(TYPE_NAME_LOOKUP.into()));
            node.insert(FIELD_ID.into(), Json::String(id.to_string()));
            return Ok(node);
        }

        let schema = Arc::clone(object.schema());
        if self.runtime.codecs().schema_by_id(schema.type_id()).is_none() {
            return Err(Error::UnknownTypeId(schema.type_id()));
        }

        let id = Uuid::new_v4();
        self.identities.insert(address, id);

        let mut children = Vec::new();
        for (index, property) in schema.properties().iter().enumerate() {
            if let Some(value) = object.property_at(index) {
                property
                    .type_spec()
                    .emit_readable_children(property.name(), &value, self, &mut children)?;
            }
        }
        let extensions = self.serialize_extensions(object)?;

        node.insert(FIELD_TYPE.into(), Json::String(schema.name().to_string()));
        node.insert(FIELD_CHILDREN.into(), Json::Array(children));
        if !extensions.is_empty() {
            node.insert(FIELD_EXTENSIONS.into(), Json::Array(extensions));
        }
        node.insert(FIELD_ID.into(), Json::String(id.to_string()));
        Ok(node)
    }

    /// Created late-deserializable extensions, in creation order.
    pub fn serialize_extensions(&mut self, object: &Arc<HanaObject>) -> Result<Vec<Json>> {
        let mut nodes = Vec::new();
        for (_, extension) in object.extensions() {
            if let ExtensionInstance::Object(ext) = extension {
                if ext.schema().is_late_deserializable() {
                    nodes.push(Json::Object(self.serialize(&Value::Object(ext))?));
                }
            }
        }
        Ok(nodes)
    }

    pub fn serialize_map_entry(&mut self, key: &Value, value: &Value) -> Result<NodeFields> {
        let mut node = NodeFields::new();
        node.insert(FIELD_TYPE.into(), Json::String(TYPE_NAME_MAP_ENTRY.into()));
        node.insert(FIELD_KEY.into(), Json::Object(self.serialize(key)?));
        node.insert(FIELD_VALUE.into(), Json::Object(self.serialize(value)?));
        Ok(node)
    }

    /// Encode `value` as a JSON tree.
    pub fn to_tree(&mut self, value: &Value) -> Result<Json> {
        Ok(Json::Object(self.serialize(value)?))
    }

    /// Encode `value` as pretty-printed JSON text.
    pub fn to_text(&mut self, value: &Value) -> Result<String> {
        let tree = self.to_tree(value)?;
        Ok(serde_json::to_string_pretty(&tree)?)
    }
}
