// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Readable (JSON tree) children per type spec.

use super::{PropertySink, TypeSpec};
use crate::codec::{ReadableDeserializer, ReadableSerializer};
use crate::config::FIELD_FUNC;
use crate::error::{Error, Result};
use crate::value::PropertyValue;
use serde_json::{Map, Value as Json};

impl TypeSpec {
    /// Append the child nodes for one property, each tagged with `func`.
    ///
    /// An absent optional emits nothing, lists emit one node per element and
    /// maps one map entry node per entry.
    pub fn emit_readable_children(
        &self,
        property: &str,
        value: &PropertyValue,
        ser: &mut ReadableSerializer<'_>,
        out: &mut Vec<Json>,
    ) -> Result<()> {
        let mut push = |mut node: Map<String, Json>| {
            node.insert(FIELD_FUNC.to_string(), Json::String(property.to_string()));
            out.push(Json::Object(node));
        };
        match (self, value) {
            (Self::Variable(inner), value) => inner.emit_readable_children(property, value, ser, out),
            (Self::Optional(_), PropertyValue::Single(None)) => Ok(()),
            (
                Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_),
                PropertyValue::Single(Some(v)),
            ) => {
                push(ser.serialize(v)?);
                Ok(())
            }
            (Self::Terminal(_) | Self::Wrapped(_), PropertyValue::Single(None)) => {
                Err(Error::MissingValue(property.to_string()))
            }
            (Self::List(_), PropertyValue::List(items)) => {
                for item in items {
                    push(ser.serialize(item)?);
                }
                Ok(())
            }
            (Self::Map { .. }, PropertyValue::Map(map)) => {
                for (k, v) in map.iter() {
                    push(ser.serialize_map_entry(k, v)?);
                }
                Ok(())
            }
            (_, other) => Err(self.shape_mismatch(other)),
        }
    }

    /// Decode one child node into property `index` of `sink`.
    pub fn unpack_readable(
        &self,
        index: usize,
        node: &Json,
        sink: &mut dyn PropertySink,
        de: &mut ReadableDeserializer<'_>,
    ) -> Result<()> {
        match self {
            Self::Variable(inner) => inner.unpack_readable(index, node, sink, de),
            Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_) => {
                let value = self.prepare(de.deserialize(node)?)?;
                sink.set_value(index, Some(value))
            }
            Self::List(inner) => {
                let value = inner.prepare(de.deserialize(node)?)?;
                sink.push_value(index, value)
            }
            Self::Map { value: inner, .. } => {
                let (key, value) = de.deserialize_map_entry(node)?;
                sink.put_entry(index, self.prepare_key(key)?, inner.prepare(value)?)
            }
        }
    }
}
