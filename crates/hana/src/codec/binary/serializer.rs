// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{int, uuid_bytes, CborMap};
use crate::config::{
    CodecOptions, EXTENSIONS_TAG, IDENTITY_TAG, TYPE_ID_LOOKUP, TYPE_ID_MAP_ENTRY, TYPE_TAG,
    VALUE_TAG,
};
use crate::error::{Error, Result};
use crate::extension::ExtensionInstance;
use crate::runtime::Runtime;
use crate::schema::HanaObject;
use crate::value::Value;
use ciborium::value::Value as Cbor;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Writes values as CBOR units. One instance per encode call.
pub struct BinarySerializer<'a> {
    runtime: &'a Runtime,
    options: CodecOptions,
    identities: HashMap<usize, Uuid>,
}

impl<'a> BinarySerializer<'a> {
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

    /// Encode one value as a unit.
    pub fn serialize(&mut self, value: &Value) -> Result<Cbor> {
        match value {
            Value::Object(object) => self.serialize_object(object),
            other => {
                let plugin = Arc::clone(self.runtime.codecs().plugin_for(other)?);
                let payload = plugin.pack(other, self)?;
                Ok(Cbor::Map(vec![
                    (int(TYPE_TAG), int(plugin.type_id().into())),
                    (int(VALUE_TAG), payload),
                ]))
            }
        }
    }

    fn serialize_object(&mut self, object: &Arc<HanaObject>) -> Result<Cbor> {
        let address = Arc::as_ptr(object) as usize;
        if let Some(id) = self.identities.get(&address) {
            return Ok(Cbor::Map(vec![
                (int(TYPE_TAG), int(TYPE_ID_LOOKUP.into())),
                (int(VALUE_TAG), uuid_bytes(id)),
            ]));
        }

        let schema = object.schema();
        if self.runtime.codecs().schema_by_id(schema.type_id()).is_none() {
            return Err(Error::UnknownTypeId(schema.type_id()));
        }

        let id = Uuid::new_v4();
        self.identities.insert(address, id);
        let content = self.pack_object_content(object)?;
        Ok(Cbor::Map(vec![
            (int(TYPE_TAG), int(schema.type_id().into())),
            (int(VALUE_TAG), content),
            (int(IDENTITY_TAG), uuid_bytes(&id)),
        ]))
    }

    /// Emitted properties keyed by id, plus the extension list.
    pub fn pack_object_content(&mut self, object: &Arc<HanaObject>) -> Result<Cbor> {
        let schema = Arc::clone(object.schema());
        let mut entries = CborMap::with_capacity(schema.properties().len() + 1);
        for (index, property) in schema.properties().iter().enumerate() {
            let Some(value) = object.property_at(index) else {
                continue;
            };
            let spec = property.type_spec();
            if spec.should_emit_binary(&value) {
                let packed = spec.pack_binary(property.name(), &value, self)?;
                entries.push((int(property.id().into()), packed));
            }
        }
        entries.push((int(EXTENSIONS_TAG), Cbor::Array(self.serialize_extensions(object)?)));
        Ok(Cbor::Map(entries))
    }

    /// Created late-deserializable extensions, in creation order.
    pub fn serialize_extensions(&mut self, object: &Arc<HanaObject>) -> Result<Vec<Cbor>> {
        let mut units = Vec::new();
        for (_, extension) in object.extensions() {
            if let ExtensionInstance::Object(ext) = extension {
                if ext.schema().is_late_deserializable() {
                    units.push(self.serialize(&Value::Object(ext))?);
                }
            }
        }
        Ok(units)
    }

    pub fn serialize_map_entry(&mut self, key: &Value, value: &Value) -> Result<Cbor> {
        let pair = vec![self.serialize(key)?, self.serialize(value)?];
        Ok(Cbor::Map(vec![
            (int(TYPE_TAG), int(TYPE_ID_MAP_ENTRY.into())),
            (int(VALUE_TAG), Cbor::Array(pair)),
        ]))
    }

    /// Encode `value` and write the unit as CBOR bytes.
    pub fn to_bytes(&mut self, value: &Value) -> Result<Vec<u8>> {
        let unit = self.serialize(value)?;
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&unit, &mut bytes).map_err(|e| Error::Cbor(e.to_string()))?;
        Ok(bytes)
    }
}
