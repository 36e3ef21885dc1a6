// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-instance extension cache.
//!
//! Created capabilities are published through an `ArcSwap`, so lookups of
//! already created capabilities never lock. Creation is serialized by a
//! per-instance reentrant lock and re-checks the cache before calling the
//! factory, so each capability is created at most once per instance. The
//! lock is reentrant so a factory may request other capabilities of the
//! same owner.

use super::{CapabilityKey, ExtensibleType, ExtensionInstance, ExtensionRegistry};
use crate::error::{Error, Result};
use crate::schema::HanaObject;
use arc_swap::ArcSwap;
use parking_lot::ReentrantMutex;
use std::sync::Arc;

type Created = Vec<(CapabilityKey, ExtensionInstance)>;

pub struct ExtensionManager {
    extensible_type: ExtensibleType,
    registry: Arc<ExtensionRegistry>,
    created: ArcSwap<Created>,
    create_lock: ReentrantMutex<()>,
}

impl ExtensionManager {
    pub(crate) fn new(extensible_type: ExtensibleType, registry: Arc<ExtensionRegistry>) -> Self {
        Self {
            extensible_type,
            registry,
            created: ArcSwap::from_pointee(Vec::new()),
            create_lock: ReentrantMutex::new(()),
        }
    }

    pub fn extensible_type(&self) -> &ExtensibleType {
        &self.extensible_type
    }

    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    pub fn supports(&self, key: &CapabilityKey) -> bool {
        self.registry.supports(&self.extensible_type, key)
    }

    /// Non-creating presence check.
    pub fn has(&self, key: &CapabilityKey) -> bool {
        self.lookup(key).is_some()
    }

    fn lookup(&self, key: &CapabilityKey) -> Option<ExtensionInstance> {
        self.created
            .load()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, ext)| ext.clone())
    }

    /// Cached capability, created on first request.
    pub fn get(&self, owner: &Arc<HanaObject>, key: &CapabilityKey) -> Result<ExtensionInstance> {
        if let Some(ext) = self.lookup(key) {
            return Ok(ext);
        }

        let _guard = self.create_lock.lock();
        if let Some(ext) = self.lookup(key) {
            return Ok(ext);
        }

        let ext = self.registry.create(owner, &self.extensible_type, key)?;
        log::debug!(
            "[extension] created {} for '{}'",
            key,
            self.extensible_type
        );
        let mut next = Created::clone(&self.created.load());
        next.push((*key, ext.clone()));
        self.created.store(Arc::new(next));
        Ok(ext)
    }

    /// Install an already built capability under `key`.
    ///
    /// Re-adopting the instance already cached under `key` is a no-op; any
    /// other instance cached there is an error.
    pub(crate) fn adopt(&self, key: CapabilityKey, ext: ExtensionInstance) -> Result<()> {
        let _guard = self.create_lock.lock();
        if let Some(existing) = self.lookup(&key) {
            if existing.ptr_eq(&ext) {
                return Ok(());
            }
            return Err(Error::ExtensionConflict {
                extensible: self.extensible_type.to_string(),
                capability: key.to_string(),
            });
        }
        if !self.supports(&key) {
            return Err(Error::UnsupportedCapability {
                extensible: self.extensible_type.to_string(),
                capability: key.to_string(),
            });
        }
        log::debug!("[extension] adopted {} for '{}'", key, self.extensible_type);
        let mut next = Created::clone(&self.created.load());
        next.push((key, ext));
        self.created.store(Arc::new(next));
        Ok(())
    }

    /// Created capabilities, in creation order.
    pub fn created(&self) -> Vec<(CapabilityKey, ExtensionInstance)> {
        Created::clone(&self.created.load())
    }
}
