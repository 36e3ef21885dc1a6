// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::config::{CACHE_KEY_PART_SEPARATOR, CACHE_KEY_SEPARATOR};
use crate::error::{Error, Result};
use crate::value::FilePath;
use std::fmt;

/// One component of a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKeyPart {
    String(String),
    FilePath(FilePath),
}

impl CacheKeyPart {
    /// Tagged string form used in [`CacheKey::string_key`].
    pub fn string_part(&self) -> String {
        match self {
            Self::String(v) => format!("String{}{}", CACHE_KEY_PART_SEPARATOR, v),
            Self::FilePath(v) => format!("FilePath{}{}", CACHE_KEY_PART_SEPARATOR, v.path()),
        }
    }
}

/// Identifies a value a loader can produce.
///
/// Equality compares protocol and parts; the string key is only a lookup handle.
#[derive(Clone)]
pub struct CacheKey {
    protocol: String,
    parts: Vec<CacheKeyPart>,
    string_key: String,
}

impl CacheKey {
    pub fn builder(protocol: impl Into<String>) -> CacheKeyBuilder {
        CacheKeyBuilder {
            protocol: protocol.into(),
            parts: Vec::new(),
        }
    }

    /// Build a key from its parts. Fails on an empty protocol or part list.
    pub fn new(protocol: impl Into<String>, parts: Vec<CacheKeyPart>) -> Result<Self> {
        let protocol = protocol.into();
        if protocol.is_empty() {
            return Err(Error::InvalidCacheKey("empty protocol".into()));
        }
        if parts.is_empty() {
            return Err(Error::InvalidCacheKey(format!(
                "key for protocol '{}' has no parts",
                protocol
            )));
        }
        let mut string_key = protocol.clone();
        for part in &parts {
            string_key.push_str(CACHE_KEY_SEPARATOR);
            string_key.push_str(&part.string_part());
        }
        Ok(Self {
            protocol,
            parts,
            string_key,
        })
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn parts(&self) -> &[CacheKeyPart] {
        &self.parts
    }

    /// Canonical lookup key: protocol and tagged parts joined by `|||||`.
    pub fn string_key(&self) -> &str {
        &self.string_key
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.protocol == other.protocol && self.parts == other.parts
    }
}

impl Eq for CacheKey {}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("protocol", &self.protocol)
            .field("parts", &self.parts)
            .finish()
    }
}

/// Fluent builder for [`CacheKey`].
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    protocol: String,
    parts: Vec<CacheKeyPart>,
}

impl CacheKeyBuilder {
    pub fn string(mut self, value: impl Into<String>) -> Self {
        self.parts.push(CacheKeyPart::String(value.into()));
        self
    }

    pub fn file_path(mut self, value: FilePath) -> Self {
        self.parts.push(CacheKeyPart::FilePath(value));
        self
    }

    pub fn build(self) -> Result<CacheKey> {
        CacheKey::new(self.protocol, self.parts)
    }
}
