// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{as_array, as_i64, as_map, field, require, type_id_of, uuid_of};
use crate::codec::CodecEntry;
use crate::config::{
    CodecOptions, EXTENSIONS_TAG, IDENTITY_TAG, TYPE_ID_LOOKUP, TYPE_ID_MAP_ENTRY, VALUE_TAG,
};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::schema::{HanaObject, ObjectSchema, RawData};
use crate::typespec::PropertySink;
use crate::value::Value;
use ciborium::value::Value as Cbor;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Reads CBOR units back into values. One instance per decode call.
pub struct BinaryDeserializer<'a> {
    runtime: &'a Runtime,
    options: CodecOptions,
    identities: HashMap<Uuid, Arc<HanaObject>>,
}

impl<'a> BinaryDeserializer<'a> {
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

    /// Decode one unit.
    pub fn deserialize(&mut self, unit: &Cbor) -> Result<Value> {
        let map = as_map(unit, "unit")?;
        let type_id = type_id_of(map)?;
        let payload = require(map, VALUE_TAG, "unit")?;

        if type_id == TYPE_ID_LOOKUP {
            let id = uuid_of(payload)?;
            return self
                .identities
                .get(&id)
                .map(|object| Value::Object(Arc::clone(object)))
                .ok_or_else(|| Error::UnknownLookup(id.to_string()));
        }
        if type_id == TYPE_ID_MAP_ENTRY {
            return Err(Error::Decode("map entry outside a map property".into()));
        }

        let entry = self
            .runtime
            .codecs()
            .by_type_id(type_id)
            .cloned()
            .ok_or(Error::UnknownTypeId(type_id))?;
        match entry {
            CodecEntry::Terminal(plugin) => plugin.unpack(payload, self),
            CodecEntry::Schema(schema) => self.build_object(&schema, map).map(Value::Object),
        }
    }

    /// Decode a `[key unit, value unit]` map entry unit.
    pub fn deserialize_map_entry(&mut self, unit: &Cbor) -> Result<(Value, Value)> {
        let map = as_map(unit, "map entry")?;
        if type_id_of(map)? != TYPE_ID_MAP_ENTRY {
            return Err(Error::Decode("expected a map entry unit".into()));
        }
        match as_array(require(map, VALUE_TAG, "map entry")?, "map entry")?.as_slice() {
            [key, value] => Ok((self.deserialize(key)?, self.deserialize(value)?)),
            other => Err(Error::Decode(format!(
                "map entry holds {} units, expected 2",
                other.len()
            ))),
        }
    }

    fn identity_of(unit: &[(Cbor, Cbor)]) -> Result<Uuid> {
        match field(unit, IDENTITY_TAG) {
            Some(raw) => uuid_of(raw),
            None => Ok(Uuid::new_v4()),
        }
    }

    fn build_object(
        &mut self,
        schema: &Arc<ObjectSchema>,
        unit: &[(Cbor, Cbor)],
    ) -> Result<Arc<HanaObject>> {
        let id = Self::identity_of(unit)?;
        let content = require(unit, VALUE_TAG, "object unit")?;
        let mut builder = self.runtime.builder_for(schema)?;

        if schema.is_late_deserializable() {
            let object = builder.build()?;
            self.identities.insert(id, Arc::clone(&object));
            self.populate(&object, content)?;
            return Ok(object);
        }

        let extensions = self.unpack_content(schema, content, &mut builder)?;
        let object = builder.build()?;
        self.identities.insert(id, Arc::clone(&object));
        if let Some(units) = extensions {
            self.deserialize_extensions(&object, units)?;
        }
        Ok(object)
    }

    /// Route each property entry to its spec. Returns the extension list.
    fn unpack_content<'c>(
        &mut self,
        schema: &ObjectSchema,
        content: &'c Cbor,
        sink: &mut dyn PropertySink,
    ) -> Result<Option<&'c Vec<Cbor>>> {
        let mut extensions = None;
        for (key, payload) in as_map(content, "object content")? {
            let tag = as_i64(key)
                .ok_or_else(|| Error::Decode("object content key is not an integer".into()))?;
            if tag == EXTENSIONS_TAG {
                extensions = Some(as_array(payload, "extension list")?);
                continue;
            }
            let index = u32::try_from(tag).ok().and_then(|id| schema.index_of_id(id));
            match index {
                Some(index) => {
                    #[cfg(feature = "trace")]
                    log::trace!("[binary] {}.{} <- id {}", schema.name(), schema.properties()[index].name(), tag);
                    let spec = schema.properties()[index].type_spec();
                    spec.unpack_binary(index, payload, sink, self)?;
                }
                None => log::debug!(
                    "[binary] skipping unknown property id {} of '{}'",
                    tag,
                    schema.name()
                ),
            }
        }
        Ok(extensions)
    }

    /// Attach encoded extensions to `owner` and populate them.
    pub fn deserialize_extensions(&mut self, owner: &Arc<HanaObject>, units: &[Cbor]) -> Result<()> {
        for unit in units {
            let map = as_map(unit, "extension unit")?;
            let type_id = type_id_of(map)?;
            if type_id == TYPE_ID_LOOKUP {
                // Written in full earlier in the same encode call.
                let id = uuid_of(require(map, VALUE_TAG, "extension lookup")?)?;
                let extension = self
                    .identities
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| Error::UnknownLookup(id.to_string()))?;
                owner.adopt_object_extension(extension)?;
                continue;
            }
            if self.runtime.codecs().schema_by_id(type_id).is_none() {
                log::debug!("[binary] skipping unknown extension type id {}", type_id);
                continue;
            }
            let extension = owner.get_object_extension(type_id)?;
            if let Some(raw) = field(map, IDENTITY_TAG) {
                self.identities.insert(uuid_of(raw)?, Arc::clone(&extension));
            }
            self.populate(&extension, require(map, VALUE_TAG, "extension unit")?)?;
        }
        Ok(())
    }

    /// Fill an existing late-deserializable instance from its content map.
    pub fn populate(&mut self, target: &Arc<HanaObject>, content: &Cbor) -> Result<()> {
        let schema = Arc::clone(target.schema());
        if !schema.is_late_deserializable() {
            return Err(Error::NotLateDeserializable(schema.name().to_string()));
        }
        let mut raw = RawData::new(Arc::clone(&schema));
        let extensions = self.unpack_content(&schema, content, &mut raw)?;
        target.populate(raw)?;
        if let Some(units) = extensions {
            self.deserialize_extensions(target, units)?;
        }
        target.validate()
    }

    /// Read CBOR bytes and decode the unit they hold.
    pub fn from_bytes(&mut self, bytes: &[u8]) -> Result<Value> {
        let unit: Cbor =
            ciborium::de::from_reader(bytes).map_err(|e| Error::Cbor(e.to_string()))?;
        self.deserialize(&unit)
    }
}

impl HanaObject {
    /// Populate this late-deserializable instance from an encoded unit.
    pub fn binary_populate(self: &Arc<Self>, unit: &Cbor, de: &mut BinaryDeserializer<'_>) -> Result<()> {
        let map = as_map(unit, "unit")?;
        let type_id = type_id_of(map)?;
        if type_id != self.schema().type_id() {
            return Err(Error::Decode(format!(
                "unit type id {} does not match '{}'",
                type_id,
                self.schema().name()
            )));
        }
        de.populate(self, require(map, VALUE_TAG, "unit")?)
    }
}
