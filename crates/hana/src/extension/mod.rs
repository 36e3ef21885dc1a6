// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extensions
//!
//! An extension ("capability") is an auxiliary behavior attached lazily to an
//! extensible instance. Capabilities are looked up by [`CapabilityKey`] and
//! created by the first factory found walking the instance's extensible type
//! and its supertype chain.
//!
//! # Example
//!
//! ```
//! use hana::{CapabilityKey, ExtensibleType, ExtensionInstance, ExtensionRegistry, HanaObject};
//! use std::sync::Arc;
//!
//! struct Describe(String);
//!
//! let a = ExtensibleType::new("A");
//! let b = ExtensibleType::new("B");
//! let registry = ExtensionRegistry::builder()
//!     .declare(b.clone(), None)
//!     .declare(a.clone(), Some(b.clone()))
//!     .register(b.clone(), CapabilityKey::of::<Describe>(), |_: &Arc<HanaObject>| {
//!         Ok(ExtensionInstance::native(Describe("from B".into())))
//!     })
//!     .build()?;
//!
//! assert!(registry.supports(&a, &CapabilityKey::of::<Describe>()));
//! # Ok::<(), hana::Error>(())
//! ```

mod builtin;
mod manager;
mod registry;

#[cfg(test)]
mod tests;

pub use builtin::{DoNothing, Validator};
pub use manager::ExtensionManager;
pub use registry::{ExtensionRegistry, ExtensionRegistryBuilder};

use crate::error::Result;
use crate::schema::HanaObject;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Name of a type that can carry extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensibleType(Cow<'static, str>);

impl ExtensibleType {
    /// Root of every supertype chain.
    pub const EXTENSIBLE: ExtensibleType = ExtensibleType(Cow::Borrowed("HanaExtensible"));
    /// Default supertype of schema objects.
    pub const OBJECT: ExtensibleType = ExtensibleType(Cow::Borrowed("HanaObject"));
    /// Default supertype of late-deserializable schema objects.
    pub const LATE_DESERIALIZABLE: ExtensibleType =
        ExtensibleType(Cow::Borrowed("HanaLateDeserializable"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensibleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a capability.
///
/// Native capabilities are Rust types; schema capabilities are
/// late-deserializable schema objects, keyed by their type id so that
/// decoders can map an encoded extension unit back to its capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKey {
    Native { type_id: TypeId, name: &'static str },
    Schema(i32),
}

impl CapabilityKey {
    pub fn of<T: Any>() -> Self {
        Self::Native {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn schema(type_id: i32) -> Self {
        Self::Schema(type_id)
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { name, .. } => f.write_str(name),
            Self::Schema(id) => write!(f, "schema#{}", id),
        }
    }
}

/// A created capability.
#[derive(Clone)]
pub enum ExtensionInstance {
    Native(Arc<dyn Any + Send + Sync>),
    Object(Arc<HanaObject>),
}

impl ExtensionInstance {
    pub fn native<T: Any + Send + Sync>(value: T) -> Self {
        Self::Native(Arc::new(value))
    }

    /// Downcast a native capability.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Native(any) => Arc::clone(any).downcast::<T>().ok(),
            Self::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<HanaObject>> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Native(_) => None,
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &ExtensionInstance) -> bool {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ExtensionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.write_str("ExtensionInstance::Native(..)"),
            Self::Object(obj) => write!(f, "ExtensionInstance::Object({:?})", obj),
        }
    }
}

/// Creates a capability for an owning instance.
pub trait ExtensionFactory: Send + Sync {
    fn create(&self, owner: &Arc<HanaObject>) -> Result<ExtensionInstance>;
}

impl<F> ExtensionFactory for F
where
    F: Fn(&Arc<HanaObject>) -> Result<ExtensionInstance> + Send + Sync,
{
    fn create(&self, owner: &Arc<HanaObject>) -> Result<ExtensionInstance> {
        self(owner)
    }
}
