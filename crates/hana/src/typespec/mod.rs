// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property type-spec algebra
//!
//! A [`TypeSpec`] describes how one property's value is defaulted, mutated
//! through the builder, tested for presence, and written to or read from
//! either wire form. Every composite behavior (optional presence, list and
//! map fan-out, variable delegation) is defined once here and shared by the
//! builder and both codecs.
//!
//! Composition is one level deep:
//!
//! | Spec | Inner |
//! |------|-------|
//! | `Terminal(kind)` | - |
//! | `Wrapped(kind)` | terminal kind |
//! | `Optional(inner)`, `List(inner)` | `Terminal` or `Wrapped` |
//! | `Map(key, value)` | terminal key, `Terminal` or `Wrapped` value |
//! | `Variable(inner)` | anything but `Variable` |
//!
//! # Example
//!
//! ```
//! use hana::{AccessorKind, TypeSpec};
//!
//! let spec = TypeSpec::parse("List<Wrapped<String>>")?;
//! assert!(spec.supports_accessor(AccessorKind::Add));
//! assert_eq!(spec.build_accessors("tags"), ["addTags", "getTags", "clearTags"]);
//! assert!(TypeSpec::parse("List<List<String>>").is_err());
//! # Ok::<(), hana::Error>(())
//! ```

mod binary;
mod readable;
mod shape;

#[cfg(test)]
mod tests;

pub use shape::Shape;

use crate::caching::Wrapped;
use crate::error::{Error, Result};
use crate::value::{PropertyValue, Value, ValueKind, ValueMap};
use std::fmt;

/// Builder operation available on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Set,
    Get,
    Add,
    Clear,
    Put,
    Delete,
}

impl AccessorKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Get => "get",
            Self::Add => "add",
            Self::Clear => "clear",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }

    /// `setFoo` style method name for `property`.
    pub fn method_name(&self, property: &str) -> String {
        let mut chars = property.chars();
        match chars.next() {
            Some(first) => format!("{}{}{}", self.prefix(), first.to_uppercase(), chars.as_str()),
            None => self.prefix().to_string(),
        }
    }
}

const SINGLE_ACCESSORS: &[AccessorKind] = &[AccessorKind::Set, AccessorKind::Get];
const LIST_ACCESSORS: &[AccessorKind] = &[AccessorKind::Add, AccessorKind::Get, AccessorKind::Clear];
const MAP_ACCESSORS: &[AccessorKind] = &[
    AccessorKind::Put,
    AccessorKind::Get,
    AccessorKind::Clear,
    AccessorKind::Delete,
];

/// Receives decoded property values (a builder or a raw holder).
pub trait PropertySink {
    fn set_value(&mut self, index: usize, value: Option<Value>) -> Result<()>;
    fn push_value(&mut self, index: usize, value: Value) -> Result<()>;
    fn put_entry(&mut self, index: usize, key: Value, value: Value) -> Result<()>;
}

/// How a property's value is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Terminal(ValueKind),
    Wrapped(ValueKind),
    Optional(Box<TypeSpec>),
    List(Box<TypeSpec>),
    Map { key: ValueKind, value: Box<TypeSpec> },
    Variable(Box<TypeSpec>),
}

impl TypeSpec {
    /// Map a declared shape to its spec.
    pub fn create(shape: &Shape) -> Result<TypeSpec> {
        match shape {
            Shape::Named(_) | Shape::Wrapped(_) => Self::create_single(shape),
            Shape::Optional(inner) => Ok(Self::Optional(Box::new(Self::create_single(inner)?))),
            Shape::List(inner) => Ok(Self::List(Box::new(Self::create_single(inner)?))),
            Shape::Map(key, value) => match key.as_ref() {
                Shape::Named(name) => Ok(Self::Map {
                    key: ValueKind::from_name(name),
                    value: Box::new(Self::create_single(value)?),
                }),
                other => Err(Error::InvalidShape(format!(
                    "map key must be terminal, got '{}'",
                    other
                ))),
            },
            Shape::Variable(inner) => match inner.as_ref() {
                Shape::Variable(_) => Err(Error::InvalidShape(format!(
                    "'{}' nests Variable inside Variable",
                    shape
                ))),
                other => Ok(Self::Variable(Box::new(Self::create(other)?))),
            },
        }
    }

    /// `Terminal` or `Wrapped`.
    fn create_single(shape: &Shape) -> Result<TypeSpec> {
        match shape {
            Shape::Named(name) => Ok(Self::Terminal(ValueKind::from_name(name))),
            Shape::Wrapped(inner) => match inner.as_ref() {
                Shape::Named(name) => Ok(Self::Wrapped(ValueKind::from_name(name))),
                other => Err(Error::InvalidShape(format!(
                    "Wrapped takes a terminal, got '{}'",
                    other
                ))),
            },
            other => Err(Error::InvalidShape(format!(
                "expected a terminal or Wrapped shape, got '{}'",
                other
            ))),
        }
    }

    /// Parse and create in one step.
    pub fn parse(text: &str) -> Result<TypeSpec> {
        Self::create(&Shape::parse(text)?)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// The spec with any `Variable` layer removed.
    pub fn raw(&self) -> &TypeSpec {
        match self {
            Self::Variable(inner) => inner,
            other => other,
        }
    }

    /// Value held by a freshly allocated, unpopulated instance.
    pub fn initial_value(&self) -> PropertyValue {
        match self {
            Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_) => PropertyValue::Single(None),
            Self::List(_) => PropertyValue::List(Vec::new()),
            Self::Map { .. } => PropertyValue::Map(ValueMap::new()),
            Self::Variable(inner) => inner.initial_value(),
        }
    }

    /// Builder operations for this shape. `Variable` exposes its inner shape's.
    pub fn accessors(&self) -> &'static [AccessorKind] {
        match self {
            Self::Terminal(_) | Self::Wrapped(_) | Self::Optional(_) => SINGLE_ACCESSORS,
            Self::List(_) => LIST_ACCESSORS,
            Self::Map { .. } => MAP_ACCESSORS,
            Self::Variable(inner) => inner.accessors(),
        }
    }

    pub fn supports_accessor(&self, accessor: AccessorKind) -> bool {
        self.accessors().contains(&accessor)
    }

    /// Accessor method names generated for `property`.
    pub fn build_accessors(&self, property: &str) -> Vec<String> {
        self.accessors()
            .iter()
            .map(|a| a.method_name(property))
            .collect()
    }

    /// Check and normalize one element before storage.
    ///
    /// `Wrapped` puts plain values in `Direct`. Collections check their
    /// element spec.
    pub fn prepare(&self, value: Value) -> Result<Value> {
        match self {
            Self::Terminal(kind) => check_kind(kind, value),
            Self::Wrapped(kind) => {
                let wrapped = Wrapped::wrap_if_needed(value);
                if let Wrapped::Direct(inner) = &wrapped {
                    if !kind.accepts(inner) {
                        return Err(mismatch(kind, inner));
                    }
                }
                Ok(Value::Wrapped(wrapped))
            }
            Self::Optional(inner) | Self::List(inner) | Self::Variable(inner) => {
                inner.prepare(value)
            }
            Self::Map { value: inner, .. } => inner.prepare(value),
        }
    }

    /// Check a map key before storage.
    pub fn prepare_key(&self, key: Value) -> Result<Value> {
        match self {
            Self::Map { key: kind, .. } => check_kind(kind, key),
            Self::Variable(inner) => inner.prepare_key(key),
            other => Err(Error::KindMismatch {
                expected: "map".into(),
                found: other.to_string(),
            }),
        }
    }

    /// Whether the binary codec writes this property at all.
    pub fn should_emit_binary(&self, value: &PropertyValue) -> bool {
        match self {
            Self::Optional(_) => matches!(value, PropertyValue::Single(Some(_))),
            Self::Variable(inner) => inner.should_emit_binary(value),
            _ => true,
        }
    }

    fn shape_mismatch(&self, found: &PropertyValue) -> Error {
        Error::KindMismatch {
            expected: self.to_string(),
            found: found.shape_name().to_string(),
        }
    }
}

fn check_kind(kind: &ValueKind, value: Value) -> Result<Value> {
    if kind.accepts(&value) {
        Ok(value)
    } else {
        Err(mismatch(kind, &value))
    }
}

fn mismatch(kind: &ValueKind, value: &Value) -> Error {
    Error::KindMismatch {
        expected: kind.to_string(),
        found: value.kind_name(),
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(kind) => write!(f, "{}", kind),
            Self::Wrapped(kind) => write!(f, "Wrapped<{}>", kind),
            Self::Optional(inner) => write!(f, "Optional<{}>", inner),
            Self::List(inner) => write!(f, "List<{}>", inner),
            Self::Map { key, value } => write!(f, "Map<{}, {}>", key, value),
            Self::Variable(inner) => write!(f, "Variable<{}>", inner),
        }
    }
}
