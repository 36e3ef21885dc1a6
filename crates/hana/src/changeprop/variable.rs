// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{DirtinessObserver, ObserverSet, Subscription, VersionManager, VersionedSubject, VersionedValue};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

/// Mutable versioned leaf. Always clean.
pub struct Variable<T> {
    value: RwLock<T>,
    versions: VersionManager,
    observers: ObserverSet,
}

impl<T: Clone + Send + Sync> Variable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            versions: VersionManager::new(0),
            observers: ObserverSet::new(),
        }
    }

    pub fn value(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Replace the value, bump the version and notify observers.
    pub fn set(&self, value: T) {
        *self.value.write() = value;
        self.changed();
    }

    /// Scoped in-place mutation.
    ///
    /// The version is bumped and observers notified once when the guard is
    /// dropped, unless the thread is unwinding from a panic.
    pub fn mutate(&self) -> MutateGuard<'_, T> {
        MutateGuard {
            variable: self,
            guard: Some(self.value.write()),
        }
    }

    /// Closure form of [`mutate`](Self::mutate).
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.mutate();
        f(&mut guard)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn changed(&self) {
        self.versions.bump();
        self.observers.notify();
    }
}

impl<T: Clone + Send + Sync> VersionedSubject for Variable<T> {
    fn version(&self) -> u64 {
        self.versions.get()
    }

    fn is_dirty(&self) -> bool {
        false
    }

    fn update(&self) {}

    fn subscribe(&self, observer: Weak<dyn DirtinessObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }
}

impl<T: Clone + Send + Sync> VersionedValue<T> for Variable<T> {
    fn value(&self) -> T {
        Variable::value(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &*self.value.read())
            .field("version", &self.versions.get())
            .finish()
    }
}

/// Write access handed out by [`Variable::mutate`].
pub struct MutateGuard<'a, T: Clone + Send + Sync> {
    variable: &'a Variable<T>,
    guard: Option<RwLockWriteGuard<'a, T>>,
}

impl<T: Clone + Send + Sync> Deref for MutateGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Only `None` after drop.
        self.guard.as_deref().unwrap_or_else(|| unreachable!())
    }
}

impl<T: Clone + Send + Sync> DerefMut for MutateGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.guard.as_deref_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<T: Clone + Send + Sync> Drop for MutateGuard<'_, T> {
    fn drop(&mut self) {
        // Release the write lock before observers read the new value.
        self.guard.take();
        if std::thread::panicking() {
            log::warn!("[changeprop] mutation aborted by panic, observers not notified");
            return;
        }
        self.variable.changed();
    }
}
