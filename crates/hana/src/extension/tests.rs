// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::error::Error;
use crate::schema::{ObjectBuilder, ObjectSchema};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Barrier, Mutex};
use std::thread;

struct Greeting(&'static str);

fn ty(name: &str) -> ExtensibleType {
    ExtensibleType::new(name)
}

/// A -> B -> C, plus an unrelated D, with `Greeting` registered at B.
fn chain_registry(counter: Arc<AtomicUsize>) -> Arc<ExtensionRegistry> {
    Arc::new(
        ExtensionRegistry::builder()
            .declare(ty("C"), None)
            .declare(ty("B"), Some(ty("C")))
            .declare(ty("A"), Some(ty("B")))
            .declare(ty("D"), None)
            .register(ty("B"), CapabilityKey::of::<Greeting>(), move |_: &Arc<HanaObject>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(ExtensionInstance::native(Greeting("from B")))
            })
            .build()
            .expect("valid registry"),
    )
}

fn instance_of(name: &str, supertype: &str, registry: Arc<ExtensionRegistry>) -> Arc<HanaObject> {
    let schema = ObjectSchema::builder(-1, name)
        .supertype(ty(supertype))
        .build()
        .expect("schema");
    ObjectBuilder::new(schema, registry).build().expect("instance")
}

#[test]
fn test_supports_walks_chain() {
    let registry = chain_registry(Arc::new(AtomicUsize::new(0)));
    let key = CapabilityKey::of::<Greeting>();

    assert!(registry.supports(&ty("A"), &key));
    assert!(registry.supports(&ty("B"), &key));
    assert!(!registry.supports(&ty("C"), &key));
    assert!(!registry.supports(&ty("D"), &key));

    let chain: Vec<_> = registry.chain(&ty("A")).cloned().collect();
    assert_eq!(chain, vec![ty("A"), ty("B"), ty("C")]);
    assert!(registry.is_subtype(&ty("A"), &ty("C")));
    assert!(!registry.is_subtype(&ty("C"), &ty("A")));
}

#[test]
fn test_create_through_subtype() {
    let registry = chain_registry(Arc::new(AtomicUsize::new(0)));
    let object = instance_of("A", "B", registry);

    let greeting = object.get_extension::<Greeting>().expect("inherited from B");
    assert_eq!(greeting.0, "from B");
}

#[test]
fn test_unsupported_capability_fails() {
    let registry = chain_registry(Arc::new(AtomicUsize::new(0)));
    let object = instance_of("D", "D", registry);

    let result = object.get_extension::<Greeting>();
    assert!(matches!(result, Err(Error::UnsupportedCapability { .. })));
    assert!(object.extensions().is_empty());
}

#[test]
fn test_get_extension_is_idempotent_under_contention() {
    let counter = Arc::new(AtomicUsize::new(0));
    let object = instance_of("A", "B", chain_registry(Arc::clone(&counter)));
    let key = CapabilityKey::of::<Greeting>();
    assert!(!object.has_extension(&key));

    let barrier = Arc::new(Barrier::new(16));
    let created = Arc::new(Mutex::new(Vec::new()));
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let object = Arc::clone(&object);
            let barrier = Arc::clone(&barrier);
            let created = Arc::clone(&created);
            thread::spawn(move || {
                barrier.wait();
                let ext = object
                    .get_extension_instance(&CapabilityKey::of::<Greeting>())
                    .expect("supported");
                created.lock().expect("results lock").push(ext);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread");
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    let created = created.lock().expect("results lock");
    assert!(created.iter().all(|ext| ext.ptr_eq(&created[0])));
    assert!(object.has_extension(&key));
    assert_eq!(object.extensions().len(), 1);
}

#[test]
fn test_subtype_overrides_factory() {
    let registry = Arc::new(
        ExtensionRegistry::builder()
            .declare(ty("Base"), None)
            .declare(ty("Leaf"), Some(ty("Base")))
            .register(ty("Base"), CapabilityKey::of::<Greeting>(), |_: &Arc<HanaObject>| {
                Ok(ExtensionInstance::native(Greeting("base")))
            })
            .register(ty("Leaf"), CapabilityKey::of::<Greeting>(), |_: &Arc<HanaObject>| {
                Ok(ExtensionInstance::native(Greeting("leaf")))
            })
            .build()
            .expect("registry"),
    );

    let leaf = instance_of("Leaf", "Base", Arc::clone(&registry));
    let base = instance_of("Base", "Base", registry);
    assert_eq!(leaf.get_extension::<Greeting>().expect("leaf").0, "leaf");
    assert_eq!(base.get_extension::<Greeting>().expect("base").0, "base");
}

#[test]
fn test_factory_may_request_sibling_capability() {
    struct Outer(Arc<Greeting>);

    let registry = Arc::new(
        ExtensionRegistry::builder()
            .declare(ty("R"), None)
            .register(ty("R"), CapabilityKey::of::<Greeting>(), |_: &Arc<HanaObject>| {
                Ok(ExtensionInstance::native(Greeting("inner")))
            })
            .register(ty("R"), CapabilityKey::of::<Outer>(), |owner: &Arc<HanaObject>| {
                Ok(ExtensionInstance::native(Outer(owner.get_extension::<Greeting>()?)))
            })
            .build()
            .expect("registry"),
    );
    let object = instance_of("R", "R", registry);

    let outer = object.get_extension::<Outer>().expect("outer");
    assert_eq!(outer.0 .0, "inner");
    assert_eq!(object.extensions().len(), 2);
}

#[test]
fn test_do_nothing_is_always_supported() {
    let registry = chain_registry(Arc::new(AtomicUsize::new(0)));
    for name in ["A", "B", "C", "D"] {
        assert!(registry.supports(&ty(name), &CapabilityKey::of::<DoNothing>()));
    }
    assert!(registry.supports(&ExtensibleType::LATE_DESERIALIZABLE, &CapabilityKey::of::<DoNothing>()));
}

#[test]
fn test_registry_validation() {
    let cycle = ExtensionRegistry::builder()
        .declare(ty("X"), Some(ty("Y")))
        .declare(ty("Y"), Some(ty("X")))
        .build();
    assert!(matches!(cycle, Err(Error::SupertypeCycle(_))));

    let undeclared_super = ExtensionRegistry::builder()
        .declare(ty("X"), Some(ty("Missing")))
        .build();
    assert!(matches!(undeclared_super, Err(Error::UnknownExtensibleType(_))));

    let undeclared_factory = ExtensionRegistry::builder()
        .register(ty("Nowhere"), CapabilityKey::of::<Greeting>(), |_: &Arc<HanaObject>| {
            Ok(ExtensionInstance::native(Greeting("x")))
        })
        .build();
    assert!(matches!(undeclared_factory, Err(Error::UnknownExtensibleType(_))));
}

#[test]
fn test_downcast_mismatch() {
    let registry = chain_registry(Arc::new(AtomicUsize::new(0)));
    let object = instance_of("A", "B", registry);
    let ext = object
        .get_extension_instance(&CapabilityKey::of::<Greeting>())
        .expect("greeting");
    assert!(ext.downcast::<DoNothing>().is_none());
    assert!(ext.as_object().is_none());
}
