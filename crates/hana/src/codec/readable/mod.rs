// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Readable codec over JSON trees.

mod deserializer;
mod serializer;

pub use deserializer::ReadableDeserializer;
pub use serializer::ReadableSerializer;

use super::NodeFields;
use crate::config::FIELD_TYPE;
use crate::error::{Error, Result};
use serde_json::Value as Json;

pub(crate) fn as_node<'a>(value: &'a Json, what: &str) -> Result<&'a NodeFields> {
    value
        .as_object()
        .ok_or_else(|| Error::Decode(format!("{} is not a node", what)))
}

pub(crate) fn require<'a>(node: &'a NodeFields, name: &str, what: &str) -> Result<&'a Json> {
    node.get(name)
        .ok_or_else(|| Error::Decode(format!("{} has no '{}' field", what, name)))
}

pub(crate) fn require_str<'a>(node: &'a NodeFields, name: &str, what: &str) -> Result<&'a str> {
    require(node, name, what)?
        .as_str()
        .ok_or_else(|| Error::Decode(format!("'{}' of {} is not a string", name, what)))
}

pub(crate) fn node_type(node: &NodeFields) -> Result<&str> {
    require_str(node, FIELD_TYPE, "node")
}
