// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stored shape of one property slot.

use super::{Value, ValueMap};

/// Raw value of one property: a single (possibly absent) value, a list or a map.
///
/// Which variant a slot holds is decided by the property's type spec.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Single(Option<Value>),
    List(Vec<Value>),
    Map(ValueMap),
}

impl PropertyValue {
    /// The single value, if this is a present `Single`.
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(v) => v.as_ref(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn shape_name(&self) -> &'static str {
        match self {
            Self::Single(_) => "single value",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}
