// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::typespec::TypeSpec;

/// One named, numbered property of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    id: u32,
    name: String,
    type_spec: TypeSpec,
}

impl PropertySpec {
    pub fn new(id: u32, name: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self {
            id,
            name: name.into(),
            type_spec,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_spec(&self) -> &TypeSpec {
        &self.type_spec
    }
}
