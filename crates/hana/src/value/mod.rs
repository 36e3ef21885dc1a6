// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values held by object properties.
//!
//! [`Value`] is one terminal value (or a wrapped / object reference),
//! [`PropertyValue`] is the stored shape of one property slot.

mod file_path;
mod map;
mod property;

pub use file_path::FilePath;
pub use map::ValueMap;
pub use property::PropertyValue;

use crate::caching::{CacheKey, Wrapped};
use crate::extension::ExtensibleType;
use crate::schema::HanaObject;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Terminal kind a property declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Uuid,
    FilePath,
    CacheKey,
    /// Schema object, optionally restricted to a type name or any type on its supertype chain.
    Object(Option<String>),
    /// Anything a codec plugin exists for.
    Any,
}

impl ValueKind {
    /// Parse a terminal kind name. Unknown names denote schema object types.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Integer" => Self::Integer,
            "Long" => Self::Long,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "Boolean" => Self::Boolean,
            "String" => Self::String,
            "Uuid" => Self::Uuid,
            "FilePath" => Self::FilePath,
            "CacheKey" => Self::CacheKey,
            "Object" => Self::Object(None),
            "Any" => Self::Any,
            other => Self::Object(Some(other.to_string())),
        }
    }

    /// Check whether `value` is an instance of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Integer, Value::Integer(_))
            | (Self::Long, Value::Long(_))
            | (Self::Float, Value::Float(_))
            | (Self::Double, Value::Double(_))
            | (Self::Boolean, Value::Boolean(_))
            | (Self::String, Value::String(_))
            | (Self::Uuid, Value::Uuid(_))
            | (Self::FilePath, Value::FilePath(_))
            | (Self::CacheKey, Value::CacheKey(_)) => true,
            (Self::Object(None), Value::Object(_)) => true,
            (Self::Object(Some(name)), Value::Object(obj)) => {
                let schema = obj.schema();
                if schema.type_names().iter().any(|n| n == name) {
                    return true;
                }
                // Interfaces may sit anywhere between the schema and its base.
                let target = ExtensibleType::new(name.as_str());
                obj.extension_registry().is_subtype(schema.supertype(), &target)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(Some(name)) => f.write_str(name),
            Self::Object(None) => f.write_str("Object"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Runtime class of a value, used to pick a codec plugin for plain values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Uuid,
    FilePath,
    CacheKey,
    Direct,
    Cached,
    Object,
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A dynamic terminal value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Uuid(Uuid),
    FilePath(FilePath),
    CacheKey(CacheKey),
    Wrapped(Wrapped),
    /// Schema object. Equality is instance identity.
    Object(Arc<HanaObject>),
}

impl Value {
    /// Runtime class of this value.
    pub fn class(&self) -> ValueClass {
        match self {
            Self::Integer(_) => ValueClass::Integer,
            Self::Long(_) => ValueClass::Long,
            Self::Float(_) => ValueClass::Float,
            Self::Double(_) => ValueClass::Double,
            Self::Boolean(_) => ValueClass::Boolean,
            Self::String(_) => ValueClass::String,
            Self::Uuid(_) => ValueClass::Uuid,
            Self::FilePath(_) => ValueClass::FilePath,
            Self::CacheKey(_) => ValueClass::CacheKey,
            Self::Wrapped(Wrapped::Direct(_)) => ValueClass::Direct,
            Self::Wrapped(Wrapped::Cached(_)) => ValueClass::Cached,
            Self::Object(_) => ValueClass::Object,
        }
    }

    /// Human readable kind, used in error messages.
    pub fn kind_name(&self) -> String {
        match self {
            Self::Object(obj) => obj.schema().name().to_string(),
            other => other.class().to_string(),
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f32.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_file_path(&self) -> Option<&FilePath> {
        match self {
            Self::FilePath(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_cache_key(&self) -> Option<&CacheKey> {
        match self {
            Self::CacheKey(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_wrapped(&self) -> Option<&Wrapped> {
        match self {
            Self::Wrapped(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as schema object.
    pub fn as_object(&self) -> Option<&Arc<HanaObject>> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::FilePath(a), Self::FilePath(b)) => a == b,
            (Self::CacheKey(a), Self::CacheKey(b)) => a == b,
            (Self::Wrapped(a), Self::Wrapped(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    i32 => Integer,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    String => String,
    Uuid => Uuid,
    FilePath => FilePath,
    CacheKey => CacheKey,
    Wrapped => Wrapped,
    Arc<HanaObject> => Object,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
