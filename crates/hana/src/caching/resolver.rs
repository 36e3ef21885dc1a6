// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache resolver
//!
//! Resolved values live in a `DashMap` so reads of already loaded keys never
//! block. Loading takes a single resolver-wide mutex and re-checks the map
//! before calling the loader, which bounds loader calls to one per key.

use super::{CacheKey, Wrapped};
use crate::error::{Error, Result};
use crate::value::Value;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Produces the value named by a cache key.
pub trait CacheLoader: Send + Sync {
    fn load(&self, key: &CacheKey) -> Result<Value>;
}

impl<F> CacheLoader for F
where
    F: Fn(&CacheKey) -> Result<Value> + Send + Sync,
{
    fn load(&self, key: &CacheKey) -> Result<Value> {
        self(key)
    }
}

type LoaderTable = HashMap<String, Arc<dyn CacheLoader>>;

/// Materializes [`Wrapped`] values.
pub struct CacheResolver {
    loaders: ArcSwap<LoaderTable>,
    resolved: DashMap<String, Value>,
    load_lock: Mutex<()>,
}

impl CacheResolver {
    pub fn new() -> Self {
        Self {
            loaders: ArcSwap::from_pointee(HashMap::new()),
            resolved: DashMap::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Register (or replace) the loader for `protocol`.
    pub fn register_loader<F>(&self, protocol: impl Into<String>, loader: F)
    where
        F: Fn(&CacheKey) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_shared_loader(protocol, Arc::new(loader));
    }

    pub fn register_shared_loader(&self, protocol: impl Into<String>, loader: Arc<dyn CacheLoader>) {
        let protocol = protocol.into();
        log::debug!("[cache] registering loader for protocol '{}'", protocol);
        self.loaders.rcu(|current| {
            let mut next = LoaderTable::clone(current);
            next.insert(protocol.clone(), Arc::clone(&loader));
            next
        });
    }

    pub fn has_loader(&self, protocol: &str) -> bool {
        self.loaders.load().contains_key(protocol)
    }

    pub fn is_loaded(&self, key: &CacheKey) -> bool {
        self.resolved.contains_key(key.string_key())
    }

    /// Value for `key`, loading it on first use.
    pub fn get(&self, key: &CacheKey) -> Result<Value> {
        if let Some(value) = self.resolved.get(key.string_key()) {
            return Ok(value.clone());
        }

        let _guard = self.load_lock.lock();
        if let Some(value) = self.resolved.get(key.string_key()) {
            return Ok(value.clone());
        }

        let loaders = self.loaders.load();
        let loader = loaders
            .get(key.protocol())
            .ok_or_else(|| Error::NoLoader(key.protocol().to_string()))?;
        log::debug!("[cache] loading '{}'", key.string_key());
        let value = loader.load(key)?;
        self.resolved
            .insert(key.string_key().to_string(), value.clone());
        Ok(value)
    }

    pub fn unwrap(&self, wrapped: &Wrapped) -> Result<Value> {
        match wrapped {
            Wrapped::Direct(value) => Ok((**value).clone()),
            Wrapped::Cached(key) => self.get(key),
        }
    }
}

impl Default for CacheResolver {
    fn default() -> Self {
        Self::new()
    }
}
