// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Hana - schema-driven object model
//!
//! Declared record types ("schema objects") carry typed, named properties and
//! convert losslessly to and from two wire forms: a compact binary encoding
//! (CBOR units keyed by small integer tags) and a readable tree encoding
//! (JSON nodes keyed by type alias). Objects carry lazily created, per-type
//! capabilities ("extensions") and may hold mutable, change-tracked fields.
//!
//! ## Quick Start
//!
//! ```rust
//! use hana::{ObjectSchema, Runtime, Value};
//!
//! fn main() -> hana::Result<()> {
//!     let schema = ObjectSchema::builder(-10010, "Aaa")
//!         .property(1, "stringField", "String")
//!         .property(2, "wrappedField", "Wrapped<String>")
//!         .property(3, "listField", "List<String>")
//!         .build()?;
//!
//!     let runtime = Runtime::builder().schema(schema).build()?;
//!
//!     let mut builder = runtime.new_builder("Aaa")?;
//!     builder.set("stringField", "x")?;
//!     builder.set("wrappedField", "y")?;
//!     builder.add("listField", ["p", "q"])?;
//!     let aaa = builder.build()?;
//!
//!     let bytes = runtime.to_binary(&Value::Object(aaa.clone()))?;
//!     let back = runtime.from_binary(&bytes)?;
//!     assert_eq!(back.as_object().expect("object").value("stringField")?, Some(Value::from("x")));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                             Runtime                                 |
//! |   schemas | codec registry | extension registry | builder overrides |
//! +---------------------------------------------------------------------+
//! |        Binary codec (CBOR)        |     Readable codec (JSON)       |
//! |   identity dedup | extension lists | lookups | func-routed children |
//! +---------------------------------------------------------------------+
//! |   Type-spec algebra: Terminal | Wrapped | Optional | List | Map |   |
//! |                      Variable                                       |
//! +---------------------------------------------------------------------+
//! |  Values | Cache resolver | Extension manager | Change propagation   |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`schema`] - property tables, builders, object instances
//! - [`typespec`] - the property shape algebra
//! - [`codec`] - binary and readable codecs
//! - [`extension`] - capability registry and per-instance manager
//! - [`caching`] - `Direct`/`Cached` values and the cache resolver
//! - [`changeprop`] - versioned values (`Variable`, `Constant`, `DerivedValue`)

/// Direct/Cached wrapped values, cache keys and the cache resolver.
pub mod caching;
/// Versioned, dirty-tracked values with observer notification.
pub mod changeprop;
/// Binary and readable codecs.
pub mod codec;
/// Wire constants and codec options.
pub mod config;
/// Error type shared by every module.
pub mod error;
/// Extension registry and per-instance extension manager.
pub mod extension;
/// File read/write helpers around the codecs.
pub mod file;
/// Runtime assembly (registries wired in dependency order).
pub mod runtime;
/// Object schemas, builders and instances.
pub mod schema;
/// Property type-spec algebra.
pub mod typespec;
/// Dynamic values stored in object properties.
pub mod value;

pub use caching::{CacheKey, CacheKeyPart, CacheLoader, CacheResolver, Wrapped};
pub use changeprop::{Constant, DerivedValue, Subscription, Variable, VersionedSubject};
pub use codec::{BinaryDeserializer, BinarySerializer, ReadableDeserializer, ReadableSerializer};
pub use config::CodecOptions;
pub use error::{Error, Result};
pub use extension::{
    CapabilityKey, DoNothing, ExtensibleType, ExtensionFactory, ExtensionInstance,
    ExtensionRegistry, Validator,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use schema::{
    BuilderFactory, HanaObject, ObjectBuilder, ObjectSchema, ObjectSchemaBuilder, PropertySpec,
    RawData, SchemaProfile,
};
pub use typespec::{AccessorKind, Shape, TypeSpec};
pub use value::{FilePath, PropertyValue, Value, ValueClass, ValueKind, ValueMap};

/// Hana crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
