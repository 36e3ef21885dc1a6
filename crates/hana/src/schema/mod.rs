// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object schemas
//!
//! An [`ObjectSchema`] is the property table of one schema type. Instances
//! are created through an [`ObjectBuilder`], which fills a [`RawData`]
//! holder through name-addressed accessors and then materializes an
//! immutable [`HanaObject`] (apart from its `Variable` properties).
//!
//! # Example
//!
//! ```
//! use hana::{ExtensionRegistry, ObjectBuilder, ObjectSchema, Value};
//! use std::sync::Arc;
//!
//! let schema = ObjectSchema::builder(-20, "Light")
//!     .property(1, "name", "String")
//!     .property(2, "intensity", "Variable<Double>")
//!     .build()?;
//! let extensions = Arc::new(ExtensionRegistry::builder().build()?);
//!
//! let mut builder = ObjectBuilder::new(schema, extensions);
//! builder.set("name", "key")?.set("intensity", 2.5)?;
//! let light = builder.build()?;
//!
//! light.set("intensity", 3.0)?;
//! assert_eq!(light.value("intensity")?, Some(Value::from(3.0)));
//! # Ok::<(), hana::Error>(())
//! ```

mod builder;
mod descriptor;
mod object;
mod property;
mod raw;


pub use builder::{BuilderFactory, ObjectBuilder};
pub use descriptor::{ObjectSchema, ObjectSchemaBuilder, SchemaProfile};
pub use object::{HanaObject, Slot};
pub use property::PropertySpec;
pub use raw::RawData;
