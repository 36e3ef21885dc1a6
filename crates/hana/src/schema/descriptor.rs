// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema descriptors and their fluent builder.

use super::PropertySpec;
use crate::error::{Error, Result};
use crate::extension::ExtensibleType;
use crate::typespec::{Shape, TypeSpec};
use std::collections::HashMap;
use std::sync::Arc;

/// Construction profile of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaProfile {
    /// Built once through a builder, immutable apart from Variable properties.
    Object,
    /// Every property is Variable, so the instance can be created empty and
    /// populated after construction (extensions decoded on demand).
    LateDeserializable,
}

/// Property table of one schema type.
#[derive(Debug)]
pub struct ObjectSchema {
    type_id: i32,
    type_names: Vec<String>,
    properties: Vec<PropertySpec>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
    profile: SchemaProfile,
    supertype: ExtensibleType,
}

impl ObjectSchema {
    pub fn builder(type_id: i32, type_name: impl Into<String>) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            type_id,
            type_names: vec![type_name.into()],
            properties: Vec::new(),
            profile: SchemaProfile::Object,
            supertype: None,
        }
    }

    fn empty(type_id: i32, type_names: Vec<String>, profile: SchemaProfile, supertype: ExtensibleType) -> Self {
        Self {
            type_id,
            type_names,
            properties: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            profile,
            supertype,
        }
    }

    /// Append a property. Fails on a zero id or a duplicate id or name.
    pub fn add_property(&mut self, spec: PropertySpec) -> Result<()> {
        if spec.id() == 0 {
            return Err(Error::InvalidPropertyId {
                schema: self.name().to_string(),
                id: spec.id(),
            });
        }
        if self.by_id.contains_key(&spec.id()) {
            return Err(Error::DuplicatePropertyId {
                schema: self.name().to_string(),
                id: spec.id(),
            });
        }
        if self.by_name.contains_key(spec.name()) {
            return Err(Error::DuplicatePropertyName {
                schema: self.name().to_string(),
                name: spec.name().to_string(),
            });
        }
        if self.profile == SchemaProfile::LateDeserializable && !spec.type_spec().is_variable() {
            return Err(Error::NotVariable {
                schema: self.name().to_string(),
                property: spec.name().to_string(),
            });
        }
        let index = self.properties.len();
        self.by_id.insert(spec.id(), index);
        self.by_name.insert(spec.name().to_string(), index);
        self.properties.push(spec);
        Ok(())
    }

    pub fn type_id(&self) -> i32 {
        self.type_id
    }

    /// Primary type name.
    pub fn name(&self) -> &str {
        &self.type_names[0]
    }

    /// Every alias, primary first.
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    pub fn property(&self, index: usize) -> Option<&PropertySpec> {
        self.properties.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn index_of_id(&self, id: u32) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn property_by_name(&self, name: &str) -> Option<&PropertySpec> {
        self.index_of(name).map(|i| &self.properties[i])
    }

    pub fn property_by_id(&self, id: u32) -> Option<&PropertySpec> {
        self.index_of_id(id).map(|i| &self.properties[i])
    }

    /// Index of `name` or an [`Error::UnknownProperty`].
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| Error::UnknownProperty {
            schema: self.name().to_string(),
            name: name.to_string(),
        })
    }

    pub fn profile(&self) -> SchemaProfile {
        self.profile
    }

    pub fn is_late_deserializable(&self) -> bool {
        self.profile == SchemaProfile::LateDeserializable
    }

    /// Extensible type of instances (the primary type name).
    pub fn extensible_type(&self) -> ExtensibleType {
        ExtensibleType::new(self.name())
    }

    /// Declared supertype in the extension chain.
    pub fn supertype(&self) -> &ExtensibleType {
        &self.supertype
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

enum PendingProperty {
    Text(u32, String, String),
    Shape(u32, String, Shape),
    Spec(PropertySpec),
}

/// Fluent schema builder. Shape errors surface from [`build`](Self::build).
pub struct ObjectSchemaBuilder {
    type_id: i32,
    type_names: Vec<String>,
    properties: Vec<PendingProperty>,
    profile: SchemaProfile,
    supertype: Option<ExtensibleType>,
}

impl ObjectSchemaBuilder {
    /// Additional type alias.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.type_names.push(name.into());
        self
    }

    /// Property with a textual shape such as `"List<Wrapped<String>>"`.
    pub fn property(mut self, id: u32, name: impl Into<String>, shape: &str) -> Self {
        self.properties
            .push(PendingProperty::Text(id, name.into(), shape.to_string()));
        self
    }

    pub fn property_shape(mut self, id: u32, name: impl Into<String>, shape: Shape) -> Self {
        self.properties
            .push(PendingProperty::Shape(id, name.into(), shape));
        self
    }

    pub fn property_spec(mut self, spec: PropertySpec) -> Self {
        self.properties.push(PendingProperty::Spec(spec));
        self
    }

    /// Switch to the late-deserializable profile.
    pub fn late_deserializable(mut self) -> Self {
        self.profile = SchemaProfile::LateDeserializable;
        self
    }

    /// Declared supertype (an interface or a base type).
    pub fn supertype(mut self, supertype: ExtensibleType) -> Self {
        self.supertype = Some(supertype);
        self
    }

    pub fn build(self) -> Result<Arc<ObjectSchema>> {
        if self.type_names.iter().any(|n| n.is_empty()) {
            return Err(Error::MissingTypeName(self.type_id));
        }
        let supertype = self.supertype.unwrap_or(match self.profile {
            SchemaProfile::Object => ExtensibleType::OBJECT,
            SchemaProfile::LateDeserializable => ExtensibleType::LATE_DESERIALIZABLE,
        });
        let mut schema = ObjectSchema::empty(self.type_id, self.type_names, self.profile, supertype);
        for pending in self.properties {
            let spec = match pending {
                PendingProperty::Text(id, name, text) => {
                    PropertySpec::new(id, name, TypeSpec::parse(&text)?)
                }
                PendingProperty::Shape(id, name, shape) => {
                    PropertySpec::new(id, name, TypeSpec::create(&shape)?)
                }
                PendingProperty::Spec(spec) => spec,
            };
            schema.add_property(spec)?;
        }
        log::debug!(
            "[schema] built '{}' (type id {}, {} properties)",
            schema.name(),
            schema.type_id(),
            schema.properties().len()
        );
        Ok(Arc::new(schema))
    }
}
