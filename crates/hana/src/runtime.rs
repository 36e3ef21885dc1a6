// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime assembly.
//!
//! A [`Runtime`] owns the codec registry, the extension registry, the
//! builder overrides and the cache resolver. [`RuntimeBuilder`] collects
//! registrations in any order and wires them in dependency order on
//! [`build`](RuntimeBuilder::build); everything but the cache resolver is
//! read-only afterwards.
//!
//! # Example
//!
//! ```
//! use hana::{ExtensibleType, HanaObject, ObjectSchema, Runtime, Value};
//!
//! let note = ObjectSchema::builder(-7, "Note")
//!     .late_deserializable()
//!     .property(1, "text", "Variable<String>")
//!     .build()?;
//! let doc = ObjectSchema::builder(-8, "Doc")
//!     .property(1, "title", "String")
//!     .build()?;
//!
//! let runtime = Runtime::builder()
//!     .schema(note)
//!     .schema(doc)
//!     .late_extension(ExtensibleType::new("Doc"), "Note")
//!     .build()?;
//!
//! let mut builder = runtime.new_builder("Doc")?;
//! builder.set("title", "readme")?;
//! let doc = builder.build()?;
//! doc.get_object_extension(-7)?.set("text", "hello")?;
//!
//! let back = runtime.from_readable(&runtime.to_readable(&Value::Object(doc))?)?;
//! let back = back.as_object().expect("object");
//! assert_eq!(back.get_object_extension(-7)?.value("text")?, Some(Value::from("hello")));
//! # Ok::<(), hana::Error>(())
//! ```

use crate::caching::{CacheKey, CacheLoader, CacheResolver, Wrapped};
use crate::codec::{
    BinaryDeserializer, BinarySerializer, CodecRegistry, ReadableDeserializer, ReadableSerializer,
    TerminalPlugin,
};
use crate::config::CodecOptions;
use crate::error::{Error, Result};
use crate::extension::{
    CapabilityKey, ExtensibleType, ExtensionFactory, ExtensionInstance, ExtensionRegistry,
    Validator,
};
use crate::schema::{BuilderFactory, HanaObject, ObjectBuilder, ObjectSchema};
use crate::value::Value;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::sync::Arc;

/// Registries shared by every codec call.
pub struct Runtime {
    codecs: CodecRegistry,
    extensions: Arc<ExtensionRegistry>,
    builders: HashMap<i32, Arc<dyn BuilderFactory>>,
    cache: CacheResolver,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    pub fn extensions(&self) -> &Arc<ExtensionRegistry> {
        &self.extensions
    }

    pub fn cache(&self) -> &CacheResolver {
        &self.cache
    }

    /// Schema registered under `name` (any alias).
    pub fn schema(&self, name: &str) -> Result<&Arc<ObjectSchema>> {
        self.codecs
            .schema_by_name(name)
            .ok_or_else(|| Error::UnknownSchema(name.to_string()))
    }

    /// Builder for `schema`: its override when one is registered, the
    /// default builder otherwise.
    pub fn builder_for(&self, schema: &Arc<ObjectSchema>) -> Result<ObjectBuilder> {
        match self.builders.get(&schema.type_id()) {
            Some(factory) => factory.create(schema, &self.extensions),
            None => Ok(ObjectBuilder::new(Arc::clone(schema), Arc::clone(&self.extensions))),
        }
    }

    pub fn new_builder(&self, name: &str) -> Result<ObjectBuilder> {
        let schema = Arc::clone(self.schema(name)?);
        self.builder_for(&schema)
    }

    /// Materialize a wrapped value through the cache resolver.
    pub fn unwrap(&self, wrapped: &Wrapped) -> Result<Value> {
        self.cache.unwrap(wrapped)
    }

    pub fn binary_serializer(&self, options: CodecOptions) -> BinarySerializer<'_> {
        BinarySerializer::new(self, options)
    }

    pub fn binary_deserializer(&self, options: CodecOptions) -> BinaryDeserializer<'_> {
        BinaryDeserializer::new(self, options)
    }

    pub fn readable_serializer(&self, options: CodecOptions) -> ReadableSerializer<'_> {
        ReadableSerializer::new(self, options)
    }

    pub fn readable_deserializer(&self, options: CodecOptions) -> ReadableDeserializer<'_> {
        ReadableDeserializer::new(self, options)
    }

    pub fn to_binary(&self, value: &Value) -> Result<Vec<u8>> {
        self.binary_serializer(CodecOptions::default()).to_bytes(value)
    }

    pub fn from_binary(&self, bytes: &[u8]) -> Result<Value> {
        self.binary_deserializer(CodecOptions::default()).from_bytes(bytes)
    }

    /// Pretty-printed JSON text.
    pub fn to_readable(&self, value: &Value) -> Result<String> {
        self.readable_serializer(CodecOptions::default()).to_text(value)
    }

    pub fn from_readable(&self, text: &str) -> Result<Value> {
        self.readable_deserializer(CodecOptions::default()).from_text(text)
    }

    pub fn to_tree(&self, value: &Value) -> Result<Json> {
        self.readable_serializer(CodecOptions::default()).to_tree(value)
    }

    pub fn from_tree(&self, tree: &Json) -> Result<Value> {
        self.readable_deserializer(CodecOptions::default()).from_tree(tree)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects schemas, interfaces, factories, builder overrides and loaders.
#[derive(Default)]
pub struct RuntimeBuilder {
    schemas: Vec<Arc<ObjectSchema>>,
    plugins: Vec<Arc<dyn TerminalPlugin>>,
    interfaces: Vec<(ExtensibleType, Option<ExtensibleType>)>,
    factories: Vec<(ExtensibleType, CapabilityKey, Arc<dyn ExtensionFactory>)>,
    late_extensions: Vec<(ExtensibleType, String)>,
    builders: Vec<(String, Arc<dyn BuilderFactory>)>,
    loaders: Vec<(String, Arc<dyn CacheLoader>)>,
}

impl RuntimeBuilder {
    pub fn schema(mut self, schema: Arc<ObjectSchema>) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Extra terminal plugin.
    pub fn plugin(mut self, plugin: Arc<dyn TerminalPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Declare an interface type schemas may name as their supertype.
    pub fn interface(mut self, ty: ExtensibleType, supertype: Option<ExtensibleType>) -> Self {
        self.interfaces.push((ty, supertype));
        self
    }

    /// Capability factory for `key` at `ty`.
    pub fn extension<F>(mut self, ty: ExtensibleType, key: CapabilityKey, factory: F) -> Self
    where
        F: Fn(&Arc<HanaObject>) -> Result<ExtensionInstance> + Send + Sync + 'static,
    {
        self.factories.push((ty, key, Arc::new(factory)));
        self
    }

    /// Validator run by `build()` on instances of `ty` and its subtypes.
    pub fn validator<F>(self, ty: ExtensibleType, check: F) -> Self
    where
        F: Fn(&HanaObject) -> Result<()> + Send + Sync + 'static,
    {
        let validator = Validator::new(check);
        self.extension(ty, CapabilityKey::of::<Validator>(), move |_: &Arc<HanaObject>| {
            Ok(ExtensionInstance::native(validator.clone()))
        })
    }

    /// Attach the late-deserializable schema `schema_name` to `ty` as a
    /// capability keyed by that schema's type id. Created empty on demand.
    pub fn late_extension(mut self, ty: ExtensibleType, schema_name: impl Into<String>) -> Self {
        self.late_extensions.push((ty, schema_name.into()));
        self
    }

    /// Builder override for `schema_name`.
    pub fn custom_builder<F>(mut self, schema_name: impl Into<String>, factory: F) -> Self
    where
        F: BuilderFactory + 'static,
    {
        self.builders.push((schema_name.into(), Arc::new(factory)));
        self
    }

    pub fn cache_loader<F>(mut self, protocol: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&CacheKey) -> Result<Value> + Send + Sync + 'static,
    {
        self.loaders.push((protocol.into(), Arc::new(loader)));
        self
    }

    /// Assemble the runtime.
    ///
    /// # Initialization Sequence
    /// 1. Codec registry: built-in plugins, extra plugins, then schemas
    /// 2. Builder overrides, resolved by schema name
    /// 3. Extension registry: interfaces, schema types, factories, late extensions
    /// 4. Cache resolver and its loaders
    pub fn build(self) -> Result<Runtime> {
        // Step 1: codec tables (duplicate ids and names fail here)
        let mut codecs = CodecRegistry::with_builtins()?;
        for plugin in self.plugins {
            codecs.register_plugin(plugin)?;
        }
        for schema in &self.schemas {
            codecs.register_schema(Arc::clone(schema))?;
        }

        // Step 2: builder overrides
        let mut builders: HashMap<i32, Arc<dyn BuilderFactory>> = HashMap::new();
        for (name, factory) in self.builders {
            let schema = codecs
                .schema_by_name(&name)
                .ok_or_else(|| Error::UnknownSchema(name.clone()))?;
            builders.insert(schema.type_id(), factory);
        }

        // Step 3: extension registry
        let mut registry = ExtensionRegistry::builder();
        for (ty, supertype) in self.interfaces {
            registry = registry.declare(ty, supertype);
        }
        for schema in &self.schemas {
            registry = registry.declare(schema.extensible_type(), Some(schema.supertype().clone()));
        }
        for (ty, key, factory) in self.factories {
            registry = registry.register_factory(ty, key, factory);
        }
        for (ty, name) in self.late_extensions {
            let schema = Arc::clone(
                codecs
                    .schema_by_name(&name)
                    .ok_or_else(|| Error::UnknownSchema(name.clone()))?,
            );
            if !schema.is_late_deserializable() {
                return Err(Error::NotLateDeserializable(name));
            }
            let key = CapabilityKey::schema(schema.type_id());
            let custom = builders.get(&schema.type_id()).cloned();
            registry = registry.register(ty, key, move |owner: &Arc<HanaObject>| {
                let extensions = owner.extension_registry();
                let builder = match &custom {
                    Some(factory) => factory.create(&schema, extensions)?,
                    None => ObjectBuilder::new(Arc::clone(&schema), Arc::clone(extensions)),
                };
                Ok(ExtensionInstance::Object(builder.build()?))
            });
        }
        let extensions = Arc::new(registry.build()?);

        // Step 4: cache loaders
        let cache = CacheResolver::new();
        for (protocol, loader) in self.loaders {
            cache.register_shared_loader(protocol, loader);
        }

        log::debug!(
            "[runtime] built with {} schemas, {} builder overrides",
            codecs.schemas().len(),
            builders.len()
        );
        Ok(Runtime {
            codecs,
            extensions,
            builders,
            cache,
        })
    }
}
