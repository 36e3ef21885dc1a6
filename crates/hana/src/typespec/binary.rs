// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary (CBOR) packing per type spec.

use super::{PropertySink, TypeSpec};
use crate::codec::{BinaryDeserializer, BinarySerializer};
use crate::error::{Error, Result};
use crate::value::PropertyValue;
use ciborium::value::Value as Cbor;

impl TypeSpec {
    /// Encode a property value. Collections become arrays of units, map
    /// entries become map entry units.
    pub fn pack_binary(
        &self,
        property: &str,
        value: &PropertyValue,
        ser: &mut BinarySerializer<'_>,
    ) -> Result<Cbor> {
        match (self, value) {
            (Self::Variable(inner), value) => inner.pack_binary(property, value, ser),
            (
                Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_),
                PropertyValue::Single(Some(v)),
            ) => ser.serialize(v),
            (
                Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_),
                PropertyValue::Single(None),
            ) => Err(Error::MissingValue(property.to_string())),
            (Self::List(_), PropertyValue::List(items)) => {
                let units = items
                    .iter()
                    .map(|item| ser.serialize(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Cbor::Array(units))
            }
            (Self::Map { .. }, PropertyValue::Map(map)) => {
                let units = map
                    .iter()
                    .map(|(k, v)| ser.serialize_map_entry(k, v))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Cbor::Array(units))
            }
            (_, other) => Err(self.shape_mismatch(other)),
        }
    }

    /// Decode `payload` into property `index` of `sink`.
    ///
    /// Lists append and maps put, so decoding is additive on top of whatever
    /// defaults the sink already holds.
    pub fn unpack_binary(
        &self,
        index: usize,
        payload: &Cbor,
        sink: &mut dyn PropertySink,
        de: &mut BinaryDeserializer<'_>,
    ) -> Result<()> {
        match self {
            Self::Variable(inner) => inner.unpack_binary(index, payload, sink, de),
            Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_) => {
                let value = self.prepare(de.deserialize(payload)?)?;
                sink.set_value(index, Some(value))
            }
            Self::List(inner) => {
                let items = payload
                    .as_array()
                    .ok_or_else(|| Error::Decode(format!("{} payload is not an array", self)))?;
                for item in items {
                    let value = inner.prepare(de.deserialize(item)?)?;
                    sink.push_value(index, value)?;
                }
                Ok(())
            }
            Self::Map { value: inner, .. } => {
                let entries = payload
                    .as_array()
                    .ok_or_else(|| Error::Decode(format!("{} payload is not an array", self)))?;
                for entry in entries {
                    let (key, value) = de.deserialize_map_entry(entry)?;
                    sink.put_entry(index, self.prepare_key(key)?, inner.prepare(value)?)?;
                }
                Ok(())
            }
        }
    }
}
