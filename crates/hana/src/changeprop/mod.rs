// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Change propagation
//!
//! Versioned values pair a value with a monotonically increasing version and
//! a dirty flag. [`Variable`] holds a mutable value, [`Constant`] a fixed one,
//! and [`DerivedValue`] recomputes from its dependencies on read.
//!
//! Dependents register through [`VersionedSubject::subscribe`] and keep the
//! returned [`Subscription`]; dropping it unregisters the observer.
//! Subjects only hold observers weakly.
//!
//! # Example
//!
//! ```
//! use hana::changeprop::{Dependency, DerivedValue, Variable, VersionedSubject};
//! use std::sync::Arc;
//!
//! let a = Arc::new(Variable::new(1));
//! let b = Arc::new(Variable::new(2));
//! let (da, db) = (a.clone(), b.clone());
//! let deps = vec![a.clone() as Dependency, b.clone() as Dependency];
//! let sum = DerivedValue::new(deps, move || da.value() + db.value());
//!
//! a.set(10);
//! assert!(sum.is_dirty());
//! assert_eq!(sum.value(), 12);
//! assert!(sum.version() > a.version());
//! ```

mod constant;
mod derived;
mod observers;
mod variable;
mod version;

#[cfg(test)]
mod tests;

pub use constant::Constant;
pub use derived::{largest_between_self_and_deps, DerivedValue, VersionFn};
pub use observers::{ObserverSet, Subscription};
pub use variable::{MutateGuard, Variable};
pub use version::VersionManager;

use std::sync::{Arc, Weak};

/// Receives dirtiness notifications from a subject.
pub trait DirtinessObserver: Send + Sync {
    fn notified_dirtiness(&self);
}

/// Anything that can be depended on.
pub trait VersionedSubject: Send + Sync {
    fn version(&self) -> u64;

    fn is_dirty(&self) -> bool;

    /// Bring the value up to date. No-op when clean.
    fn update(&self);

    /// Register `observer`; it stays registered while the subscription lives.
    fn subscribe(&self, observer: Weak<dyn DirtinessObserver>) -> Subscription;
}

/// A versioned subject with a readable value.
pub trait VersionedValue<T>: VersionedSubject {
    /// Current value, recomputed first if needed.
    fn value(&self) -> T;
}

/// Shared handle to a dependency.
pub type Dependency = Arc<dyn VersionedSubject>;
