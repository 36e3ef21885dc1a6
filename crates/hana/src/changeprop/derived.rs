// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derived (computed) versioned values.

use super::{
    Dependency, DirtinessObserver, ObserverSet, Subscription, VersionManager, VersionedSubject,
    VersionedValue,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Computes a derived value's next version from its current version and the
/// versions of its dependencies. Must return more than the current version.
pub type VersionFn = Arc<dyn Fn(u64, &[u64]) -> u64 + Send + Sync>;

/// Default version policy: `max(own + 1, max(deps) + 1)`.
///
/// The result always exceeds both the previous version and every dependency
/// version observed during the update.
pub fn largest_between_self_and_deps(own: u64, deps: &[u64]) -> u64 {
    let newest_dep = deps.iter().copied().max().unwrap_or(0);
    (own + 1).max(newest_dep + 1)
}

/// Value recomputed from dependencies, on read, after any of them changed.
pub struct DerivedValue<T> {
    deps: Vec<Dependency>,
    compute: Box<dyn Fn() -> T + Send + Sync>,
    version_fn: VersionFn,
    value: RwLock<T>,
    dirty: AtomicBool,
    versions: VersionManager,
    observers: ObserverSet,
    update_lock: Mutex<()>,
    _subscriptions: Vec<Subscription>,
}

impl<T: Clone + Send + Sync + 'static> DerivedValue<T> {
    pub fn new<F>(deps: Vec<Dependency>, compute: F) -> Arc<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_version_fn(deps, compute, Arc::new(largest_between_self_and_deps))
    }

    /// Build with a custom version policy.
    ///
    /// Dependencies are brought up to date and the value is computed before
    /// this returns. The result starts dirty if a dependency changed while
    /// that first value was being computed.
    pub fn with_version_fn<F>(deps: Vec<Dependency>, compute: F, version_fn: VersionFn) -> Arc<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        for dep in &deps {
            dep.update();
        }
        let dep_versions: Vec<u64> = deps.iter().map(|d| d.version()).collect();
        let initial_version = version_fn(0, &dep_versions);
        let initial = compute();

        let derived = Arc::new_cyclic(|weak: &Weak<Self>| {
            let observer: Weak<dyn DirtinessObserver> = weak.clone();
            let subscriptions = deps
                .iter()
                .map(|dep| dep.subscribe(observer.clone()))
                .collect();
            Self {
                deps,
                compute: Box::new(compute),
                version_fn,
                value: RwLock::new(initial),
                dirty: AtomicBool::new(false),
                versions: VersionManager::new(initial_version),
                observers: ObserverSet::new(),
                update_lock: Mutex::new(()),
                _subscriptions: subscriptions,
            }
        });

        // A dependency that moved before the subscriptions existed sent no
        // notification; compare against the versions the value was built from.
        let moved = derived
            .deps
            .iter()
            .zip(&dep_versions)
            .any(|(dep, &seen)| dep.is_dirty() || dep.version() != seen);
        if moved {
            log::debug!("[changeprop] dependency changed during initial compute");
            derived.dirty.store(true, Ordering::Release);
        }
        derived
    }

    /// Current value, recomputing first if a dependency changed.
    pub fn value(&self) -> T {
        self.update();
        self.value.read().clone()
    }

    /// Last computed value, possibly stale.
    pub fn cached_value(&self) -> T {
        self.value.read().clone()
    }

    fn recompute(&self) {
        let _guard = self.update_lock.lock();
        // Cleared before computing so a change during the computation marks it dirty again.
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return;
        }
        for dep in &self.deps {
            dep.update();
        }
        let dep_versions: Vec<u64> = self.deps.iter().map(|d| d.version()).collect();
        let new_version = (self.version_fn)(self.versions.get(), &dep_versions);
        let value = (self.compute)();
        *self.value.write() = value;
        self.versions.set(new_version);
    }
}

impl<T: Clone + Send + Sync + 'static> DirtinessObserver for DerivedValue<T> {
    fn notified_dirtiness(&self) {
        if !self.dirty.swap(true, Ordering::AcqRel) {
            self.observers.notify();
        }
    }
}

impl<T: Clone + Send + Sync + 'static> VersionedSubject for DerivedValue<T> {
    fn version(&self) -> u64 {
        self.versions.get()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    fn update(&self) {
        if self.is_dirty() {
            self.recompute();
        }
    }

    fn subscribe(&self, observer: Weak<dyn DirtinessObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }
}

impl<T: Clone + Send + Sync + 'static> VersionedValue<T> for DerivedValue<T> {
    fn value(&self) -> T {
        DerivedValue::value(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for DerivedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedValue")
            .field("value", &*self.value.read())
            .field("version", &self.versions.get())
            .field("dirty", &self.dirty.load(Ordering::Acquire))
            .finish()
    }
}
