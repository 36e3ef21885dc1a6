// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct CountingObserver {
    hits: AtomicUsize,
}

impl DirtinessObserver for CountingObserver {
    fn notified_dirtiness(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

fn observe(subject: &dyn VersionedSubject) -> (Arc<CountingObserver>, Subscription) {
    let observer = Arc::new(CountingObserver::default());
    let weak: std::sync::Weak<dyn DirtinessObserver> = Arc::downgrade(&observer) as _;
    let subscription = subject.subscribe(weak);
    (observer, subscription)
}

#[test]
fn test_variable_set_bumps_and_notifies() {
    let var = Variable::new(1);
    let (observer, _sub) = observe(&var);

    var.set(2);
    var.set(2);

    assert_eq!(var.value(), 2);
    assert_eq!(var.version(), 2);
    assert_eq!(observer.hits.load(Ordering::SeqCst), 2);
    assert!(!var.is_dirty());
}

#[test]
fn test_dropped_subscription_stops_notifications() {
    let var = Variable::new(0);
    let (observer, sub) = observe(&var);
    assert_eq!(var.observer_count(), 1);

    drop(sub);
    var.set(1);

    assert_eq!(observer.hits.load(Ordering::SeqCst), 0);
    assert_eq!(var.observer_count(), 0);
}

#[test]
fn test_dead_observer_is_skipped() {
    let var = Variable::new(0);
    let (observer, _sub) = observe(&var);
    drop(observer);
    var.set(1);
    assert_eq!(var.observer_count(), 0);
}

#[test]
fn test_mutate_notifies_once() {
    let var = Variable::new(vec![1]);
    let (observer, _sub) = observe(&var);

    {
        let mut guard = var.mutate();
        guard.push(2);
        guard.push(3);
    }

    assert_eq!(var.value(), vec![1, 2, 3]);
    assert_eq!(var.version(), 1);
    assert_eq!(observer.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_mutate_early_return_still_notifies() {
    fn push_checked(var: &Variable<Vec<i32>>, v: i32) -> Result<(), String> {
        let mut guard = var.mutate();
        guard.push(v);
        if v < 0 {
            return Err("negative".into());
        }
        guard.push(v);
        Ok(())
    }

    let var = Variable::new(Vec::new());
    let (observer, _sub) = observe(&var);
    assert!(push_checked(&var, -1).is_err());
    assert_eq!(var.value(), vec![-1]);
    assert_eq!(observer.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_mutate_panic_skips_notification() {
    let var = Variable::new(0);
    let (observer, _sub) = observe(&var);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut guard = var.mutate();
        *guard = 5;
        panic!("boom");
    }));

    assert!(result.is_err());
    assert_eq!(var.version(), 0);
    assert_eq!(observer.hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_modify_returns_closure_result() {
    let var = Variable::new(10);
    let old = var.modify(|v| std::mem::replace(v, 11));
    assert_eq!(old, 10);
    assert_eq!(var.value(), 11);
    assert_eq!(var.version(), 1);
}

#[test]
fn test_derived_recomputes_on_read_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let a = Arc::new(Variable::new(2));
    let (da, counter) = (a.clone(), calls.clone());
    let doubled = DerivedValue::new(vec![a.clone() as Dependency], move || {
        counter.fetch_add(1, Ordering::SeqCst);
        da.value() * 2
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!doubled.is_dirty());

    a.set(5);
    assert!(doubled.is_dirty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(doubled.cached_value(), 4);

    assert_eq!(doubled.value(), 10);
    assert_eq!(doubled.value(), 10);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_derived_starts_dirty_when_dependency_moves_during_first_compute() {
    let a = Arc::new(Variable::new(2));
    let bumped = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let (da, flag) = (a.clone(), bumped.clone());
    let doubled = DerivedValue::new(vec![a.clone() as Dependency], move || {
        let current = da.value();
        if !flag.swap(true, Ordering::SeqCst) {
            da.set(7);
        }
        current * 2
    });

    assert!(doubled.is_dirty());
    assert_eq!(doubled.cached_value(), 4);
    assert_eq!(doubled.value(), 14);
    assert!(!doubled.is_dirty());
    assert!(doubled.version() > a.version());
}

#[test]
fn test_derived_version_exceeds_dependencies() {
    let a = Arc::new(Variable::new(1));
    let b = Arc::new(Variable::new(2));
    let (da, db) = (a.clone(), b.clone());
    let sum = DerivedValue::new(
        vec![a.clone() as Dependency, b.clone() as Dependency],
        move || da.value() + db.value(),
    );

    for i in 0..5 {
        a.set(i);
        if i % 2 == 0 {
            b.set(i * 10);
        }
        sum.update();
        assert!(sum.version() > a.version());
        assert!(sum.version() > b.version());
    }
    assert_eq!(sum.value(), 4 + 40);
}

#[test]
fn test_dirtiness_cascades_once() {
    let a = Arc::new(Variable::new(1));
    let da = a.clone();
    let inner = DerivedValue::new(vec![a.clone() as Dependency], move || da.value() + 1);
    let di = inner.clone();
    let outer = DerivedValue::new(vec![inner.clone() as Dependency], move || di.value() * 10);
    let (observer, _sub) = observe(outer.as_ref());

    a.set(2);
    a.set(3);

    assert!(inner.is_dirty());
    assert!(outer.is_dirty());
    assert_eq!(observer.hits.load(Ordering::SeqCst), 1);

    assert_eq!(outer.value(), 40);
    assert!(!inner.is_dirty());
    assert!(outer.version() > inner.version());
}

#[test]
fn test_dropping_derived_unsubscribes() {
    let a = Arc::new(Variable::new(0));
    let derived = DerivedValue::new(vec![a.clone() as Dependency], || 0);
    assert_eq!(a.observer_count(), 1);
    drop(derived);
    assert_eq!(a.observer_count(), 0);
}

#[test]
fn test_constant_is_inert() {
    let c = Arc::new(Constant::new("fixed"));
    assert_eq!(c.version(), 0);
    assert!(!c.is_dirty());
    let (observer, _sub) = observe(c.as_ref());
    let dc = c.clone();
    let derived = DerivedValue::new(vec![c.clone() as Dependency], move || dc.value().len());
    assert_eq!(derived.value(), 5);
    assert_eq!(observer.hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_custom_version_fn() {
    let a = Arc::new(Variable::new(0));
    let da = a.clone();
    let derived = DerivedValue::with_version_fn(
        vec![a.clone() as Dependency],
        move || da.value(),
        Arc::new(|own: u64, _deps: &[u64]| own + 100),
    );
    assert_eq!(derived.version(), 100);
    a.set(1);
    assert_eq!(derived.value(), 1);
    assert_eq!(derived.version(), 200);
}

#[test]
fn test_largest_between_self_and_deps() {
    assert_eq!(largest_between_self_and_deps(0, &[]), 1);
    assert_eq!(largest_between_self_and_deps(5, &[1, 2]), 6);
    assert_eq!(largest_between_self_and_deps(1, &[7, 3]), 8);
}

#[test]
#[should_panic(expected = "version must increase")]
fn test_version_manager_rejects_decrease() {
    let versions = VersionManager::new(3);
    versions.set(3);
}
