// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::CacheKey;
use crate::value::Value;

/// A value that is either present now or deferred behind a cache key.
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapped {
    Direct(Box<Value>),
    Cached(CacheKey),
}

impl Wrapped {
    pub fn direct(value: impl Into<Value>) -> Self {
        Self::Direct(Box::new(value.into()))
    }

    pub fn cached(key: CacheKey) -> Self {
        Self::Cached(key)
    }

    /// Keep wrapped values as they are, put anything else in `Direct`.
    pub fn wrap_if_needed(value: Value) -> Self {
        match value {
            Value::Wrapped(w) => w,
            other => Self::Direct(Box::new(other)),
        }
    }

    pub fn as_direct(&self) -> Option<&Value> {
        match self {
            Self::Direct(v) => Some(v),
            Self::Cached(_) => None,
        }
    }

    pub fn as_cached(&self) -> Option<&CacheKey> {
        match self {
            Self::Cached(k) => Some(k),
            Self::Direct(_) => None,
        }
    }
}
