// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary codec over CBOR value trees.

mod deserializer;
mod serializer;

pub use deserializer::BinaryDeserializer;
pub use serializer::BinarySerializer;

use crate::config::TYPE_TAG;
use crate::error::{Error, Result};
use ciborium::value::Value as Cbor;
use uuid::Uuid;

pub(crate) type CborMap = Vec<(Cbor, Cbor)>;

pub(crate) fn int(value: i64) -> Cbor {
    Cbor::Integer(value.into())
}

pub(crate) fn as_i64(value: &Cbor) -> Option<i64> {
    value.as_integer().and_then(|i| i64::try_from(i).ok())
}

/// Entry of `map` keyed by integer `tag`.
pub(crate) fn field(map: &[(Cbor, Cbor)], tag: i64) -> Option<&Cbor> {
    map.iter()
        .find(|(k, _)| as_i64(k) == Some(tag))
        .map(|(_, v)| v)
}

pub(crate) fn require<'a>(map: &'a [(Cbor, Cbor)], tag: i64, what: &str) -> Result<&'a Cbor> {
    field(map, tag).ok_or_else(|| Error::Decode(format!("{} has no tag {}", what, tag)))
}

pub(crate) fn as_map<'a>(value: &'a Cbor, what: &str) -> Result<&'a CborMap> {
    value
        .as_map()
        .ok_or_else(|| Error::Decode(format!("{} is not a map", what)))
}

pub(crate) fn as_array<'a>(value: &'a Cbor, what: &str) -> Result<&'a Vec<Cbor>> {
    value
        .as_array()
        .ok_or_else(|| Error::Decode(format!("{} is not an array", what)))
}

/// Type id of a unit map.
pub(crate) fn type_id_of(unit: &[(Cbor, Cbor)]) -> Result<i32> {
    let raw = require(unit, TYPE_TAG, "unit")?;
    as_i64(raw)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| Error::Decode("unit type id is not a 32-bit integer".into()))
}

pub(crate) fn uuid_bytes(id: &Uuid) -> Cbor {
    Cbor::Bytes(id.as_bytes().to_vec())
}

pub(crate) fn uuid_of(value: &Cbor) -> Result<Uuid> {
    let bytes = value
        .as_bytes()
        .ok_or_else(|| Error::Decode("identifier is not a byte string".into()))?;
    Uuid::from_slice(bytes).map_err(|e| Error::Decode(format!("bad identifier: {}", e)))
}
