// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Observer bookkeeping.
//!
//! Observers are stored weakly and keyed by a per-set id. A [`Subscription`]
//! removes its entry on drop. Notification snapshots the live observers under
//! the lock and calls them after releasing it, so an observer may subscribe or
//! unsubscribe from inside its callback.

use super::DirtinessObserver;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

#[derive(Default)]
struct Entries {
    next_id: u64,
    observers: Vec<(u64, Weak<dyn DirtinessObserver>)>,
}

/// Weakly held observers of one subject.
#[derive(Default)]
pub struct ObserverSet {
    entries: Arc<Mutex<Entries>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Weak<dyn DirtinessObserver>) -> Subscription {
        let mut entries = self.entries.lock();
        let id = entries.next_id;
        entries.next_id += 1;
        entries.observers.push((id, observer));
        Subscription {
            entries: Arc::downgrade(&self.entries),
            id,
        }
    }

    /// Call every live observer once. Dead entries are pruned.
    pub fn notify(&self) {
        let live: Vec<Arc<dyn DirtinessObserver>> = {
            let mut entries = self.entries.lock();
            entries.observers.retain(|(_, weak)| weak.strong_count() > 0);
            entries
                .observers
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect()
        };
        for observer in live {
            observer.notified_dirtiness();
        }
    }

    /// Number of registered observers that are still alive.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .observers
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration handle. Dropping it unregisters the observer.
#[must_use = "dropping a subscription unregisters the observer"]
pub struct Subscription {
    entries: Weak<Mutex<Entries>>,
    id: u64,
}

impl Subscription {
    /// A subscription that was never registered anywhere.
    pub fn inert() -> Self {
        Self {
            entries: Weak::new(),
            id: 0,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.lock().observers.retain(|(id, _)| *id != self.id);
        }
    }
}
