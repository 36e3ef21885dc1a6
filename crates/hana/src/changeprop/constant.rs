// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{DirtinessObserver, Subscription, VersionedSubject, VersionedValue};
use std::sync::Weak;

/// Fixed value. Version 0, never dirty, never notifies.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant<T> {
    value: T,
}

impl<T: Clone + Send + Sync> Constant<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> T {
        self.value.clone()
    }
}

impl<T: Clone + Send + Sync> VersionedSubject for Constant<T> {
    fn version(&self) -> u64 {
        0
    }

    fn is_dirty(&self) -> bool {
        false
    }

    fn update(&self) {}

    fn subscribe(&self, _observer: Weak<dyn DirtinessObserver>) -> Subscription {
        Subscription::inert()
    }
}

impl<T: Clone + Send + Sync> VersionedValue<T> for Constant<T> {
    fn value(&self) -> T {
        self.value.clone()
    }
}
