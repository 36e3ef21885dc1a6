// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use parking_lot::Mutex;

/// Version counter guarded by its own mutex.
#[derive(Debug)]
pub struct VersionManager {
    version: Mutex<u64>,
}

impl VersionManager {
    pub fn new(initial: u64) -> Self {
        Self {
            version: Mutex::new(initial),
        }
    }

    pub fn get(&self) -> u64 {
        *self.version.lock()
    }

    /// Increment and return the new version.
    pub fn bump(&self) -> u64 {
        let mut version = self.version.lock();
        *version += 1;
        *version
    }

    /// Set a strictly greater version.
    ///
    /// # Panics
    ///
    /// Panics if `new_version` does not exceed the current one; that only
    /// happens when dependencies were updated out of order.
    pub fn set(&self, new_version: u64) {
        let mut version = self.version.lock();
        assert!(
            new_version > *version,
            "version must increase: {} -> {}",
            *version,
            new_version
        );
        *version = new_version;
    }
}

impl Default for VersionManager {
    fn default() -> Self {
        Self::new(0)
    }
}
