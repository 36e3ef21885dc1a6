// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in terminal plugins.
//!
//! Scalars carry their literal payload in both forms. `Uuid` is 16 raw
//! bytes or a hyphenated string, `FilePath` is `[relative, path]` or
//! `{relative, value}`. `Direct`, `Cached` and `CacheKey` nest full units.

use super::binary::{as_array, as_i64, int};
use super::{
    BinaryDeserializer, BinarySerializer, NodeFields, ReadableDeserializer, ReadableSerializer,
    TerminalPlugin,
};
use crate::caching::{CacheKey, CacheKeyPart, Wrapped};
use crate::config::*;
use crate::error::{Error, Result};
use crate::value::{FilePath, Value, ValueClass};
use ciborium::value::Value as Cbor;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::sync::Arc;
use uuid::Uuid;

/// One plugin per built-in terminal type.
pub fn builtin_plugins() -> Vec<Arc<dyn TerminalPlugin>> {
    vec![
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_INTEGER,
            type_name: TYPE_NAME_INTEGER,
            class: ValueClass::Integer,
            to_cbor: |v| v.as_i32().map(|x| int(x.into())),
            from_cbor: |c| as_i64(c).and_then(|x| i32::try_from(x).ok()).map(Value::Integer),
            to_json: |v| v.as_i32().map(Json::from),
            from_json: |j| j.as_i64().and_then(|x| i32::try_from(x).ok()).map(Value::Integer),
        }),
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_LONG,
            type_name: TYPE_NAME_LONG,
            class: ValueClass::Long,
            to_cbor: |v| v.as_i64().map(int),
            from_cbor: |c| as_i64(c).map(Value::Long),
            to_json: |v| v.as_i64().map(Json::from),
            from_json: |j| j.as_i64().map(Value::Long),
        }),
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_FLOAT,
            type_name: TYPE_NAME_FLOAT,
            class: ValueClass::Float,
            to_cbor: |v| v.as_f32().map(|x| Cbor::Float(x.into())),
            from_cbor: |c| c.as_float().map(|x| Value::Float(x as f32)),
            to_json: |v| v.as_f32().map(|x| float_to_json(f64::from(x))),
            from_json: |j| float_from_json(j).map(|x| Value::Float(x as f32)),
        }),
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_DOUBLE,
            type_name: TYPE_NAME_DOUBLE,
            class: ValueClass::Double,
            to_cbor: |v| v.as_f64().map(Cbor::Float),
            from_cbor: |c| c.as_float().map(Value::Double),
            to_json: |v| v.as_f64().map(float_to_json),
            from_json: |j| float_from_json(j).map(Value::Double),
        }),
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_BOOLEAN,
            type_name: TYPE_NAME_BOOLEAN,
            class: ValueClass::Boolean,
            to_cbor: |v| v.as_bool().map(Cbor::Bool),
            from_cbor: |c| c.as_bool().map(Value::Boolean),
            to_json: |v| v.as_bool().map(Json::Bool),
            from_json: |j| j.as_bool().map(Value::Boolean),
        }),
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_STRING,
            type_name: TYPE_NAME_STRING,
            class: ValueClass::String,
            to_cbor: |v| v.as_str().map(|s| Cbor::Text(s.to_string())),
            from_cbor: |c| c.as_text().map(Value::from),
            to_json: |v| v.as_str().map(Json::from),
            from_json: |j| j.as_str().map(Value::from),
        }),
        Arc::new(ScalarPlugin {
            type_id: TYPE_ID_UUID,
            type_name: TYPE_NAME_UUID,
            class: ValueClass::Uuid,
            to_cbor: |v| v.as_uuid().map(|u| Cbor::Bytes(u.as_bytes().to_vec())),
            from_cbor: |c| {
                c.as_bytes()
                    .and_then(|b| Uuid::from_slice(b).ok())
                    .map(Value::Uuid)
            },
            to_json: |v| v.as_uuid().map(|u| Json::String(u.to_string())),
            from_json: |j| j.as_str().and_then(|s| Uuid::parse_str(s).ok()).map(Value::Uuid),
        }),
        Arc::new(FilePathPlugin),
        Arc::new(CacheKeyPlugin),
        Arc::new(DirectPlugin),
        Arc::new(CachedPlugin),
    ]
}

fn pack_mismatch(expected: &str, value: &Value) -> Error {
    Error::KindMismatch {
        expected: expected.to_string(),
        found: value.kind_name(),
    }
}

fn bad_payload(type_name: &str) -> Error {
    Error::Decode(format!("malformed {} payload", type_name))
}

fn field<'a>(node: &'a NodeFields, name: &str, type_name: &str) -> Result<&'a Json> {
    node.get(name).ok_or_else(|| bad_payload(type_name))
}

/// JSON numbers cannot hold NaN or infinities, so those travel as strings.
fn float_to_json(x: f64) -> Json {
    if x.is_nan() {
        Json::from(FLOAT_NAN)
    } else if x == f64::INFINITY {
        Json::from(FLOAT_INFINITY)
    } else if x == f64::NEG_INFINITY {
        Json::from(FLOAT_NEG_INFINITY)
    } else {
        Json::from(x)
    }
}

fn float_from_json(node: &Json) -> Option<f64> {
    match node {
        Json::String(s) if s == FLOAT_NAN => Some(f64::NAN),
        Json::String(s) if s == FLOAT_INFINITY => Some(f64::INFINITY),
        Json::String(s) if s == FLOAT_NEG_INFINITY => Some(f64::NEG_INFINITY),
        other => other.as_f64(),
    }
}

// ============================================================================
// Scalars
// ============================================================================

/// Literal payload in both forms, converted through plain functions.
struct ScalarPlugin {
    type_id: i32,
    type_name: &'static str,
    class: ValueClass,
    to_cbor: fn(&Value) -> Option<Cbor>,
    from_cbor: fn(&Cbor) -> Option<Value>,
    to_json: fn(&Value) -> Option<Json>,
    from_json: fn(&Json) -> Option<Value>,
}

impl TerminalPlugin for ScalarPlugin {
    fn type_id(&self) -> i32 {
        self.type_id
    }

    fn type_name(&self) -> &str {
        self.type_name
    }

    fn value_class(&self) -> ValueClass {
        self.class
    }

    fn pack(&self, value: &Value, _: &mut BinarySerializer<'_>) -> Result<Cbor> {
        (self.to_cbor)(value).ok_or_else(|| pack_mismatch(self.type_name, value))
    }

    fn unpack(&self, payload: &Cbor, _: &mut BinaryDeserializer<'_>) -> Result<Value> {
        (self.from_cbor)(payload).ok_or_else(|| bad_payload(self.type_name))
    }

    fn to_node(&self, value: &Value, _: &mut ReadableSerializer<'_>) -> Result<NodeFields> {
        let json = (self.to_json)(value).ok_or_else(|| pack_mismatch(self.type_name, value))?;
        let mut node = NodeFields::new();
        node.insert(FIELD_VALUE.into(), json);
        Ok(node)
    }

    fn from_node(&self, node: &NodeFields, _: &mut ReadableDeserializer<'_>) -> Result<Value> {
        (self.from_json)(field(node, FIELD_VALUE, self.type_name)?)
            .ok_or_else(|| bad_payload(self.type_name))
    }
}

// ============================================================================
// FilePath
// ============================================================================

struct FilePathPlugin;

impl TerminalPlugin for FilePathPlugin {
    fn type_id(&self) -> i32 {
        TYPE_ID_FILE_PATH
    }

    fn type_name(&self) -> &str {
        TYPE_NAME_FILE_PATH
    }

    fn value_class(&self) -> ValueClass {
        ValueClass::FilePath
    }

    fn pack(&self, value: &Value, ser: &mut BinarySerializer<'_>) -> Result<Cbor> {
        let path = value
            .as_file_path()
            .ok_or_else(|| pack_mismatch(TYPE_NAME_FILE_PATH, value))?;
        Ok(Cbor::Array(vec![
            Cbor::Bool(path.is_relative()),
            Cbor::Text(path.serialized_path(ser.options().base_dir())),
        ]))
    }

    fn unpack(&self, payload: &Cbor, de: &mut BinaryDeserializer<'_>) -> Result<Value> {
        match as_array(payload, TYPE_NAME_FILE_PATH)?.as_slice() {
            [Cbor::Bool(relative), Cbor::Text(raw)] => Ok(Value::FilePath(
                FilePath::from_serialized(*relative, raw, de.options().base_dir()),
            )),
            _ => Err(bad_payload(TYPE_NAME_FILE_PATH)),
        }
    }

    fn to_node(&self, value: &Value, ser: &mut ReadableSerializer<'_>) -> Result<NodeFields> {
        let path = value
            .as_file_path()
            .ok_or_else(|| pack_mismatch(TYPE_NAME_FILE_PATH, value))?;
        let node = FilePathNode {
            relative: path.is_relative(),
            value: path.serialized_path(ser.options().base_dir()),
        };
        match serde_json::to_value(node)? {
            Json::Object(fields) => Ok(fields),
            _ => Err(bad_payload(TYPE_NAME_FILE_PATH)),
        }
    }

    fn from_node(&self, node: &NodeFields, de: &mut ReadableDeserializer<'_>) -> Result<Value> {
        let FilePathNode { relative, value } =
            serde_json::from_value(Json::Object(node.clone()))
                .map_err(|_| bad_payload(TYPE_NAME_FILE_PATH))?;
        Ok(Value::FilePath(FilePath::from_serialized(
            relative,
            &value,
            de.options().base_dir(),
        )))
    }
}

/// Readable `FilePath` fields next to `type`.
#[derive(Serialize, Deserialize)]
struct FilePathNode {
    relative: bool,
    value: String,
}

struct CacheKeyPlugin;

fn part_from_value(value: Value) -> Result<CacheKeyPart> {
    match value {
        Value::String(s) => Ok(CacheKeyPart::String(s)),
        Value::FilePath(p) => Ok(CacheKeyPart::FilePath(p)),
        other => Err(Error::Decode(format!(
            "cache key part cannot be {}",
            other.kind_name()
        ))),
    }
}

fn part_value(part: &CacheKeyPart) -> Value {
    match part {
        CacheKeyPart::String(s) => Value::String(s.clone()),
        CacheKeyPart::FilePath(p) => Value::FilePath(p.clone()),
    }
}

impl TerminalPlugin for CacheKeyPlugin {
    fn type_id(&self) -> i32 {
        TYPE_ID_CACHE_KEY
    }

    fn type_name(&self) -> &str {
        TYPE_NAME_CACHE_KEY
    }

    fn value_class(&self) -> ValueClass {
        ValueClass::CacheKey
    }

    fn pack(&self, value: &Value, ser: &mut BinarySerializer<'_>) -> Result<Cbor> {
        let key = value
            .as_cache_key()
            .ok_or_else(|| pack_mismatch(TYPE_NAME_CACHE_KEY, value))?;
        let parts = key
            .parts()
            .iter()
            .map(|part| ser.serialize(&part_value(part)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Cbor::Array(vec![
            Cbor::Text(key.protocol().to_string()),
            Cbor::Array(parts),
        ]))
    }

    fn unpack(&self, payload: &Cbor, de: &mut BinaryDeserializer<'_>) -> Result<Value> {
        let [Cbor::Text(protocol), Cbor::Array(units)] = as_array(payload, TYPE_NAME_CACHE_KEY)?.as_slice()
        else {
            return Err(bad_payload(TYPE_NAME_CACHE_KEY));
        };
        let parts = units
            .iter()
            .map(|unit| part_from_value(de.deserialize(unit)?))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::CacheKey(CacheKey::new(protocol.clone(), parts)?))
    }

    fn to_node(&self, value: &Value, ser: &mut ReadableSerializer<'_>) -> Result<NodeFields> {
        let key = value
            .as_cache_key()
            .ok_or_else(|| pack_mismatch(TYPE_NAME_CACHE_KEY, value))?;
        let mut parts = Vec::with_capacity(key.parts().len());
        for part in key.parts() {
            parts.push(match part {
                CacheKeyPart::String(s) => Json::String(s.clone()),
                CacheKeyPart::FilePath(_) => Json::Object(ser.serialize(&part_value(part))?),
            });
        }
        let mut node = NodeFields::new();
        node.insert(FIELD_PROTOCOL.into(), Json::String(key.protocol().to_string()));
        node.insert(FIELD_PARTS.into(), Json::Array(parts));
        Ok(node)
    }

    fn from_node(&self, node: &NodeFields, de: &mut ReadableDeserializer<'_>) -> Result<Value> {
        let protocol = field(node, FIELD_PROTOCOL, TYPE_NAME_CACHE_KEY)?
            .as_str()
            .ok_or_else(|| bad_payload(TYPE_NAME_CACHE_KEY))?;
        let items = field(node, FIELD_PARTS, TYPE_NAME_CACHE_KEY)?
            .as_array()
            .ok_or_else(|| bad_payload(TYPE_NAME_CACHE_KEY))?;
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            parts.push(match item {
                Json::String(s) => CacheKeyPart::String(s.clone()),
                other => part_from_value(de.deserialize(other)?)?,
            });
        }
        Ok(Value::CacheKey(CacheKey::new(protocol, parts)?))
    }
}

// ============================================================================
// Direct / Cached
// ============================================================================

struct DirectPlugin;

fn direct_inner(value: &Value) -> Result<&Value> {
    value
        .as_wrapped()
        .and_then(Wrapped::as_direct)
        .ok_or_else(|| pack_mismatch(TYPE_NAME_DIRECT, value))
}

impl TerminalPlugin for DirectPlugin {
    fn type_id(&self) -> i32 {
        TYPE_ID_DIRECT
    }

    fn type_name(&self) -> &str {
        TYPE_NAME_DIRECT
    }

    fn value_class(&self) -> ValueClass {
        ValueClass::Direct
    }

    fn pack(&self, value: &Value, ser: &mut BinarySerializer<'_>) -> Result<Cbor> {
        ser.serialize(direct_inner(value)?)
    }

    fn unpack(&self, payload: &Cbor, de: &mut BinaryDeserializer<'_>) -> Result<Value> {
        Ok(Value::Wrapped(Wrapped::Direct(Box::new(de.deserialize(payload)?))))
    }

    fn to_node(&self, value: &Value, ser: &mut ReadableSerializer<'_>) -> Result<NodeFields> {
        let inner = ser.serialize(direct_inner(value)?)?;
        let mut node = NodeFields::new();
        node.insert(FIELD_VALUE.into(), Json::Object(inner));
        Ok(node)
    }

    fn from_node(&self, node: &NodeFields, de: &mut ReadableDeserializer<'_>) -> Result<Value> {
        let inner = de.deserialize(field(node, FIELD_VALUE, TYPE_NAME_DIRECT)?)?;
        Ok(Value::Wrapped(Wrapped::Direct(Box::new(inner))))
    }
}

struct CachedPlugin;

fn cached_key(value: &Value) -> Result<Value> {
    value
        .as_wrapped()
        .and_then(Wrapped::as_cached)
        .map(|key| Value::CacheKey(key.clone()))
        .ok_or_else(|| pack_mismatch(TYPE_NAME_CACHED, value))
}

fn into_cached(value: Value) -> Result<Value> {
    match value {
        Value::CacheKey(key) => Ok(Value::Wrapped(Wrapped::Cached(key))),
        _ => Err(bad_payload(TYPE_NAME_CACHED)),
    }
}

impl TerminalPlugin for CachedPlugin {
    fn type_id(&self) -> i32 {
        TYPE_ID_CACHED
    }

    fn type_name(&self) -> &str {
        TYPE_NAME_CACHED
    }

    fn value_class(&self) -> ValueClass {
        ValueClass::Cached
    }

    fn pack(&self, value: &Value, ser: &mut BinarySerializer<'_>) -> Result<Cbor> {
        ser.serialize(&cached_key(value)?)
    }

    fn unpack(&self, payload: &Cbor, de: &mut BinaryDeserializer<'_>) -> Result<Value> {
        into_cached(de.deserialize(payload)?)
    }

    fn to_node(&self, value: &Value, ser: &mut ReadableSerializer<'_>) -> Result<NodeFields> {
        let key = ser.serialize(&cached_key(value)?)?;
        let mut node = NodeFields::new();
        node.insert(FIELD_VALUE.into(), Json::Object(key));
        Ok(node)
    }

    fn from_node(&self, node: &NodeFields, de: &mut ReadableDeserializer<'_>) -> Result<Value> {
        into_cached(de.deserialize(field(node, FIELD_VALUE, TYPE_NAME_CACHED)?)?)
    }
}
