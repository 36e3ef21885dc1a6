// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{as_node, node_type, require, require_str};
use crate::codec::{CodecEntry, NodeFields};
use crate::config::{
    CodecOptions, FIELD_CHILDREN, FIELD_EXTENSIONS, FIELD_FUNC, FIELD_ID, FIELD_KEY, FIELD_VALUE,
    TYPE_NAME_LOOKUP, TYPE_NAME_MAP_ENTRY,
};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::schema::{HanaObject, ObjectSchema, RawData};
use crate::typespec::PropertySink;
use crate::value::Value;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Reads JSON nodes back into values. One instance per decode call.
pub struct ReadableDeserializer<'a> {
    runtime: &'a Runtime,
    options: CodecOptions,
    identities: HashMap<Uuid, Arc<HanaObject>>,
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Decode(format!("bad identifier '{}': {}", raw, e)))
}

impl<'a> ReadableDeserializer<'a> {
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

    /// Decode one node.
    pub fn deserialize(&mut self, node: &Json) -> Result<Value> {
        let fields = as_node(node, "value")?;
        let type_name = node_type(fields)?;

        if type_name == TYPE_NAME_LOOKUP {
            let id = parse_id(require_str(fields, FIELD_ID, "lookup node")?)?;
            return self
                .identities
                .get(&id)
                .map(|object| Value::Object(Arc::clone(object)))
                .ok_or_else(|| Error::UnknownLookup(id.to_string()));
        }
        if type_name == TYPE_NAME_MAP_ENTRY {
            return Err(Error::Decode("map entry outside a map property".into()));
        }

        let entry = self
            .runtime
            .codecs()
            .by_name(type_name)
            .cloned()
            .ok_or_else(|| Error::UnknownTypeName(type_name.to_string()))?;
        match entry {
            CodecEntry::Terminal(plugin) => plugin.from_node(fields, self),
            CodecEntry::Schema(schema) => self.build_object(&schema, fields).map(Value::Object),
        }
    }

    /// Decode a `{type: MapEntry, key, value}` node.
    pub fn deserialize_map_entry(&mut self, node: &Json) -> Result<(Value, Value)> {
        let fields = as_node(node, "map entry")?;
        if node_type(fields)? != TYPE_NAME_MAP_ENTRY {
            return Err(Error::Decode("expected a map entry node".into()));
        }
        let key = self.deserialize(require(fields, FIELD_KEY, "map entry")?)?;
        let value = self.deserialize(require(fields, FIELD_VALUE, "map entry")?)?;
        Ok((key, value))
    }

    fn identity_of(node: &NodeFields) -> Result<Uuid> {
        match node.get(FIELD_ID).and_then(Json::as_str) {
            Some(raw) => parse_id(raw),
            None => Ok(Uuid::new_v4()),
        }
    }

    fn build_object(&mut self, schema: &Arc<ObjectSchema>, node: &NodeFields) -> Result<Arc<HanaObject>> {
        let id = Self::identity_of(node)?;
        let mut builder = self.runtime.builder_for(schema)?;

        if schema.is_late_deserializable() {
            let object = builder.build()?;
            self.identities.insert(id, Arc::clone(&object));
            self.populate(&object, node)?;
            return Ok(object);
        }

        self.unpack_children(schema, node, &mut builder)?;
        let object = builder.build()?;
        self.identities.insert(id, Arc::clone(&object));
        self.deserialize_extensions(&object, node)?;
        Ok(object)
    }

    /// Route each child to the property its `func` names.
    ///
    /// Collections grow by one element or entry per matching child.
    fn unpack_children(
        &mut self,
        schema: &ObjectSchema,
        node: &NodeFields,
        sink: &mut dyn PropertySink,
    ) -> Result<()> {
        let Some(children) = node.get(FIELD_CHILDREN) else {
            return Ok(());
        };
        let children = children
            .as_array()
            .ok_or_else(|| Error::Decode(format!("children of '{}' is not an array", schema.name())))?;
        for child in children {
            let func = require_str(as_node(child, "child")?, FIELD_FUNC, "child")?;
            match schema.index_of(func) {
                Some(index) => {
                    #[cfg(feature = "trace")]
                    log::trace!("[readable] {}.{}", schema.name(), func);
                    let spec = schema.properties()[index].type_spec();
                    spec.unpack_readable(index, child, sink, self)?;
                }
                None => log::debug!(
                    "[readable] skipping unknown func '{}' of '{}'",
                    func,
                    schema.name()
                ),
            }
        }
        Ok(())
    }

    /// Attach the `extensions` of an object node to `owner`.
    pub fn deserialize_extensions(&mut self, owner: &Arc<HanaObject>, node: &NodeFields) -> Result<()> {
        let Some(extensions) = node.get(FIELD_EXTENSIONS) else {
            return Ok(());
        };
        let extensions = extensions
            .as_array()
            .ok_or_else(|| Error::Decode("extension list is not an array".into()))?;
        for ext_node in extensions {
            let fields = as_node(ext_node, "extension")?;
            let type_name = node_type(fields)?;
            if type_name == TYPE_NAME_LOOKUP {
                // Written in full earlier in the same encode call.
                let id = parse_id(require_str(fields, FIELD_ID, "extension lookup")?)?;
                let extension = self
                    .identities
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| Error::UnknownLookup(id.to_string()))?;
                owner.adopt_object_extension(extension)?;
                continue;
            }
            let Some(schema) = self.runtime.codecs().schema_by_name(type_name).cloned() else {
                log::debug!("[readable] skipping unknown extension type '{}'", type_name);
                continue;
            };
            let extension = owner.get_object_extension(schema.type_id())?;
            if let Some(raw) = fields.get(FIELD_ID).and_then(Json::as_str) {
                self.identities.insert(parse_id(raw)?, Arc::clone(&extension));
            }
            self.populate(&extension, fields)?;
        }
        Ok(())
    }

    /// Fill an existing late-deserializable instance from its node.
    pub fn populate(&mut self, target: &Arc<HanaObject>, node: &NodeFields) -> Result<()> {
        let schema = Arc::clone(target.schema());
        if !schema.is_late_deserializable() {
            return Err(Error::NotLateDeserializable(schema.name().to_string()));
        }
        let mut raw = RawData::new(Arc::clone(&schema));
        self.unpack_children(&schema, node, &mut raw)?;
        target.populate(raw)?;
        self.deserialize_extensions(target, node)?;
        target.validate()
    }

    /// Decode a JSON tree.
    pub fn from_tree(&mut self, tree: &Json) -> Result<Value> {
        self.deserialize(tree)
    }

    /// Parse JSON text and decode it.
    pub fn from_text(&mut self, text: &str) -> Result<Value> {
        let tree: Json = serde_json::from_str(text)?;
        self.deserialize(&tree)
    }
}

impl HanaObject {
    /// Populate this late-deserializable instance from an encoded node.
    pub fn readable_populate(self: &Arc<Self>, node: &Json, de: &mut ReadableDeserializer<'_>) -> Result<()> {
        let fields = as_node(node, "node")?;
        let type_name = node_type(fields)?;
        if !self.schema().type_names().iter().any(|n| n == type_name) {
            return Err(Error::Decode(format!(
                "node type '{}' does not match '{}'",
                type_name,
                self.schema().name()
            )));
        }
        de.populate(self, fields)
    }
}
