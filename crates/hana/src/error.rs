// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every Hana module.
//!
//! Variants are grouped the way failures surface: schema authoring mistakes
//! (caught when descriptors are assembled), data access mistakes (wrong
//! property name or accessor), decode shape errors (abort the whole decode
//! call), capability and cache resolution failures.
//!
//! # Example
//!
//! ```
//! use hana::{Error, ObjectSchema};
//!
//! let result = ObjectSchema::builder(7, "Dup")
//!     .property(1, "a", "String")
//!     .property(1, "b", "String")
//!     .build();
//! assert!(matches!(result, Err(Error::DuplicatePropertyId { id: 1, .. })));
//! ```

use std::fmt;

#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Schema Authoring Errors
    // ========================================================================
    /// Declared property shape cannot be mapped to a type spec.
    InvalidShape(String),
    /// Property id is zero (ids must be positive).
    InvalidPropertyId { schema: String, id: u32 },
    /// Two properties of one schema share an id.
    DuplicatePropertyId { schema: String, id: u32 },
    /// Two properties of one schema share a name.
    DuplicatePropertyName { schema: String, name: String },
    /// Schema has no type name.
    MissingTypeName(i32),
    /// Two registered types share a type id.
    DuplicateTypeId(i32),
    /// Two registered types share a type alias.
    DuplicateTypeName(String),
    /// Late-deserializable schema declares a non-Variable property.
    NotVariable { schema: String, property: String },
    /// Schema used where a late-deserializable one is required.
    NotLateDeserializable(String),
    /// Extensible type referenced before it was declared.
    UnknownExtensibleType(String),
    /// Supertype chain loops back on itself.
    SupertypeCycle(String),
    /// Cache key without protocol or parts.
    InvalidCacheKey(String),

    // ========================================================================
    // Data Access Errors
    // ========================================================================
    /// Schema has no property with this name.
    UnknownProperty { schema: String, name: String },
    /// No schema registered under this name or type id.
    UnknownSchema(String),
    /// Accessor not available for the property's shape (e.g. `add` on a Terminal).
    UnsupportedAccessor { property: String, accessor: String },
    /// Value kind does not match the declared kind.
    KindMismatch { expected: String, found: String },
    /// Required (Terminal or Wrapped) property was never set.
    MissingValue(String),

    // ========================================================================
    // Decode Errors
    // ========================================================================
    /// Payload does not match the structural shape expected for its type.
    Decode(String),
    /// Back-reference to a surrogate id not seen earlier in the same call.
    UnknownLookup(String),
    /// No plugin registered for a binary type id.
    UnknownTypeId(i32),
    /// No plugin registered for a readable type alias.
    UnknownTypeName(String),
    /// No plugin registered for a value class.
    NoPlugin(String),

    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// No factory in the supertype chain provides the capability.
    UnsupportedCapability { extensible: String, capability: String },
    /// Created extension has a different concrete type than requested.
    ExtensionTypeMismatch(String),
    /// Another instance is already installed under the capability.
    ExtensionConflict { extensible: String, capability: String },
    /// Validator rejected a freshly built instance.
    Validation(String),

    // ========================================================================
    // Cache Errors
    // ========================================================================
    /// No loader registered for a cache key protocol.
    NoLoader(String),
    /// Loader failed to produce a value.
    LoadFailed { key: String, reason: String },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// I/O error with underlying cause.
    Io(std::io::Error),
    /// CBOR encoding or decoding failed.
    Cbor(String),
    /// JSON encoding or decoding failed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Schema authoring
            Error::InvalidShape(msg) => write!(f, "Invalid property shape: {}", msg),
            Error::InvalidPropertyId { schema, id } => {
                write!(f, "Invalid property id {} in '{}' (must be positive)", id, schema)
            }
            Error::DuplicatePropertyId { schema, id } => {
                write!(f, "Duplicate property id {} in '{}'", id, schema)
            }
            Error::DuplicatePropertyName { schema, name } => {
                write!(f, "Duplicate property name '{}' in '{}'", name, schema)
            }
            Error::MissingTypeName(id) => write!(f, "Schema {} has no type name", id),
            Error::DuplicateTypeId(id) => write!(f, "Type id {} registered twice", id),
            Error::DuplicateTypeName(name) => write!(f, "Type name '{}' registered twice", name),
            Error::NotVariable { schema, property } => write!(
                f,
                "Property '{}' of late-deserializable '{}' is not Variable",
                property, schema
            ),
            Error::NotLateDeserializable(name) => {
                write!(f, "Schema '{}' is not late-deserializable", name)
            }
            Error::UnknownExtensibleType(name) => {
                write!(f, "Unknown extensible type '{}'", name)
            }
            Error::SupertypeCycle(name) => write!(f, "Supertype cycle through '{}'", name),
            Error::InvalidCacheKey(msg) => write!(f, "Invalid cache key: {}", msg),
            // Data access
            Error::UnknownProperty { schema, name } => {
                write!(f, "'{}' has no property '{}'", schema, name)
            }
            Error::UnknownSchema(name) => write!(f, "Unknown schema '{}'", name),
            Error::UnsupportedAccessor { property, accessor } => write!(
                f,
                "Accessor '{}' is not available on property '{}'",
                accessor, property
            ),
            Error::KindMismatch { expected, found } => {
                write!(f, "Kind mismatch: expected {}, found {}", expected, found)
            }
            Error::MissingValue(property) => write!(f, "Property '{}' has no value", property),
            // Decode
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
            Error::UnknownLookup(id) => write!(f, "Unknown lookup id {}", id),
            Error::UnknownTypeId(id) => write!(f, "No plugin for type id {}", id),
            Error::UnknownTypeName(name) => write!(f, "No plugin for type name '{}'", name),
            Error::NoPlugin(class) => write!(f, "No plugin for value class {}", class),
            // Capability
            Error::UnsupportedCapability {
                extensible,
                capability,
            } => write!(
                f,
                "Extensible type '{}' does not support capability {}",
                extensible, capability
            ),
            Error::ExtensionTypeMismatch(msg) => write!(f, "Extension type mismatch: {}", msg),
            Error::ExtensionConflict {
                extensible,
                capability,
            } => write!(
                f,
                "Extensible type '{}' already holds another instance of {}",
                extensible, capability
            ),
            Error::Validation(msg) => write!(f, "Validation failed: {}", msg),
            // Cache
            Error::NoLoader(protocol) => {
                write!(f, "No cache loader registered for protocol '{}'", protocol)
            }
            Error::LoadFailed { key, reason } => {
                write!(f, "Loading '{}' failed: {}", key, reason)
            }
            // I/O
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Cbor(msg) => write!(f, "CBOR error: {}", msg),
            Error::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
