// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capabilities every runtime knows about.

use crate::error::Result;
use crate::schema::HanaObject;
use std::fmt;
use std::sync::Arc;

/// Capability with no behavior, registered at every declared extensible type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DoNothing;

/// Checks a freshly built instance. `build()` runs it when the schema's
/// extensible type supports it.
#[derive(Clone)]
pub struct Validator {
    check: Arc<dyn Fn(&HanaObject) -> Result<()> + Send + Sync>,
}

impl Validator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&HanaObject) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    pub fn validate(&self, object: &HanaObject) -> Result<()> {
        (self.check)(object)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}
