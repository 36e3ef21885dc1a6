// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extension registry
//!
//! Immutable after [`ExtensionRegistryBuilder::build`]. Resolution walks the
//! supertype chain from the requested type toward its root and stops at the
//! first factory registered for the capability.

use super::{CapabilityKey, DoNothing, ExtensibleType, ExtensionFactory, ExtensionInstance};
use crate::error::{Error, Result};
use crate::schema::HanaObject;
use std::collections::HashMap;
use std::sync::Arc;

type FactoryMap = HashMap<CapabilityKey, Arc<dyn ExtensionFactory>>;

/// Per-type capability factories plus the supertype map.
pub struct ExtensionRegistry {
    supertypes: HashMap<ExtensibleType, Option<ExtensibleType>>,
    factories: HashMap<ExtensibleType, FactoryMap>,
}

impl ExtensionRegistry {
    /// Builder with the base types already declared.
    pub fn builder() -> ExtensionRegistryBuilder {
        ExtensionRegistryBuilder::new()
    }

    pub fn is_declared(&self, ty: &ExtensibleType) -> bool {
        self.supertypes.contains_key(ty)
    }

    pub fn supertype(&self, ty: &ExtensibleType) -> Option<&ExtensibleType> {
        self.supertypes.get(ty).and_then(Option::as_ref)
    }

    /// `ty` followed by its supertypes, root last.
    pub fn chain<'a>(&'a self, ty: &'a ExtensibleType) -> impl Iterator<Item = &'a ExtensibleType> {
        std::iter::successors(Some(ty), move |current| self.supertype(current))
    }

    /// Whether `ty` is `ancestor` or inherits from it.
    pub fn is_subtype(&self, ty: &ExtensibleType, ancestor: &ExtensibleType) -> bool {
        self.chain(ty).any(|t| t == ancestor)
    }

    fn find_factory(
        &self,
        ty: &ExtensibleType,
        key: &CapabilityKey,
    ) -> Option<&Arc<dyn ExtensionFactory>> {
        self.chain(ty)
            .find_map(|t| self.factories.get(t).and_then(|map| map.get(key)))
    }

    pub fn supports(&self, ty: &ExtensibleType, key: &CapabilityKey) -> bool {
        self.find_factory(ty, key).is_some()
    }

    /// Create `key` for `owner` with the first factory on the chain of `ty`.
    pub fn create(
        &self,
        owner: &Arc<HanaObject>,
        ty: &ExtensibleType,
        key: &CapabilityKey,
    ) -> Result<ExtensionInstance> {
        let factory =
            self.find_factory(ty, key)
                .ok_or_else(|| Error::UnsupportedCapability {
                    extensible: ty.to_string(),
                    capability: key.to_string(),
                })?;
        factory.create(owner)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects type declarations and factories, validated on `build()`.
pub struct ExtensionRegistryBuilder {
    supertypes: HashMap<ExtensibleType, Option<ExtensibleType>>,
    factories: HashMap<ExtensibleType, FactoryMap>,
}

impl ExtensionRegistryBuilder {
    fn new() -> Self {
        Self {
            supertypes: HashMap::new(),
            factories: HashMap::new(),
        }
        .declare(ExtensibleType::EXTENSIBLE, None)
        .declare(ExtensibleType::OBJECT, Some(ExtensibleType::EXTENSIBLE))
        .declare(
            ExtensibleType::LATE_DESERIALIZABLE,
            Some(ExtensibleType::OBJECT),
        )
    }

    /// Declare an extensible type and its supertype (`None` for a root).
    ///
    /// Every declared type gets the [`DoNothing`] capability.
    pub fn declare(mut self, ty: ExtensibleType, supertype: Option<ExtensibleType>) -> Self {
        self.factories
            .entry(ty.clone())
            .or_default()
            .entry(CapabilityKey::of::<DoNothing>())
            .or_insert_with(|| Arc::new(create_do_nothing) as Arc<dyn ExtensionFactory>);
        self.supertypes.insert(ty, supertype);
        self
    }

    /// Register a closure factory for `key` at `ty`.
    pub fn register<F>(self, ty: ExtensibleType, key: CapabilityKey, factory: F) -> Self
    where
        F: Fn(&Arc<HanaObject>) -> Result<ExtensionInstance> + Send + Sync + 'static,
    {
        self.register_factory(ty, key, Arc::new(factory))
    }

    /// Register a factory for `key` at `ty`, replacing any earlier one at the same type.
    pub fn register_factory(
        mut self,
        ty: ExtensibleType,
        key: CapabilityKey,
        factory: Arc<dyn ExtensionFactory>,
    ) -> Self {
        log::debug!("[extension] factory for {} at '{}'", key, ty);
        self.factories.entry(ty).or_default().insert(key, factory);
        self
    }

    pub fn is_declared(&self, ty: &ExtensibleType) -> bool {
        self.supertypes.contains_key(ty)
    }

    pub fn build(self) -> Result<ExtensionRegistry> {
        for ty in self.factories.keys() {
            if !self.supertypes.contains_key(ty) {
                return Err(Error::UnknownExtensibleType(ty.to_string()));
            }
        }
        for (ty, supertype) in &self.supertypes {
            let mut seen = 0usize;
            let mut current = supertype.as_ref();
            while let Some(next) = current {
                if next == ty || seen > self.supertypes.len() {
                    return Err(Error::SupertypeCycle(ty.to_string()));
                }
                current = match self.supertypes.get(next) {
                    Some(parent) => parent.as_ref(),
                    None => return Err(Error::UnknownExtensibleType(next.to_string())),
                };
                seen += 1;
            }
        }
        Ok(ExtensionRegistry {
            supertypes: self.supertypes,
            factories: self.factories,
        })
    }
}

fn create_do_nothing(_: &Arc<HanaObject>) -> Result<ExtensionInstance> {
    Ok(ExtensionInstance::native(DoNothing))
}

impl Default for ExtensionRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
