// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::caching::CacheKey;

#[test]
fn test_shape_parse_nested() {
    let shape = Shape::parse("Map<String, Wrapped<Integer>>").expect("valid shape");
    assert_eq!(
        shape,
        Shape::map(
            Shape::named("String"),
            Shape::wrapped(Shape::named("Integer"))
        )
    );
    assert_eq!(shape.to_string(), "Map<String, Wrapped<Integer>>");
}

#[test]
fn test_shape_parse_errors() {
    for text in ["", "List<", "List<String", "List<String>>", "Map<String>", "Foo<Bar>", "List<A, B>", "A$"] {
        assert!(
            matches!(Shape::parse(text), Err(Error::InvalidShape(_))),
            "'{}' should be rejected",
            text
        );
    }
}

#[test]
fn test_create_each_variant() {
    assert_eq!(
        TypeSpec::parse("Integer").expect("terminal"),
        TypeSpec::Terminal(ValueKind::Integer)
    );
    assert_eq!(
        TypeSpec::parse("Wrapped<String>").expect("wrapped"),
        TypeSpec::Wrapped(ValueKind::String)
    );
    assert_eq!(
        TypeSpec::parse("Optional<Wrapped<Double>>").expect("optional"),
        TypeSpec::Optional(Box::new(TypeSpec::Wrapped(ValueKind::Double)))
    );
    assert_eq!(
        TypeSpec::parse("Variable<List<Long>>").expect("variable"),
        TypeSpec::Variable(Box::new(TypeSpec::List(Box::new(TypeSpec::Terminal(
            ValueKind::Long
        )))))
    );
    assert_eq!(
        TypeSpec::parse("Map<Uuid, Mesh>").expect("map"),
        TypeSpec::Map {
            key: ValueKind::Uuid,
            value: Box::new(TypeSpec::Terminal(ValueKind::Object(Some("Mesh".into())))),
        }
    );
}

#[test]
fn test_create_rejects_deep_composition() {
    for text in [
        "List<List<String>>",
        "Optional<Optional<String>>",
        "Wrapped<List<String>>",
        "Map<List<String>, String>",
        "Map<String, Map<String, String>>",
        "Optional<Variable<String>>",
        "Variable<Variable<String>>",
    ] {
        assert!(
            matches!(TypeSpec::parse(text), Err(Error::InvalidShape(_))),
            "'{}' should be rejected",
            text
        );
    }
}

#[test]
fn test_initial_values() {
    assert_eq!(
        TypeSpec::parse("String").expect("spec").initial_value(),
        PropertyValue::Single(None)
    );
    assert_eq!(
        TypeSpec::parse("List<String>").expect("spec").initial_value(),
        PropertyValue::List(Vec::new())
    );
    assert_eq!(
        TypeSpec::parse("Variable<Map<String, Integer>>")
            .expect("spec")
            .initial_value(),
        PropertyValue::Map(ValueMap::new())
    );
}

#[test]
fn test_accessor_names() {
    let map = TypeSpec::parse("Variable<Map<String, Integer>>").expect("spec");
    assert_eq!(
        map.build_accessors("weights"),
        ["putWeights", "getWeights", "clearWeights", "deleteWeights"]
    );
    let single = TypeSpec::parse("Optional<String>").expect("spec");
    assert!(single.supports_accessor(AccessorKind::Set));
    assert!(!single.supports_accessor(AccessorKind::Add));
    assert_eq!(AccessorKind::Set.method_name("x"), "setX");
}

#[test]
fn test_prepare_wraps_plain_values() {
    let spec = TypeSpec::parse("Wrapped<String>").expect("spec");
    assert_eq!(
        spec.prepare(Value::from("y")).expect("wrapped"),
        Value::Wrapped(Wrapped::direct("y"))
    );

    let key = CacheKey::builder("tex").string("a").build().expect("key");
    let cached = Value::Wrapped(Wrapped::Cached(key));
    assert_eq!(spec.prepare(cached.clone()).expect("cached"), cached);

    assert!(matches!(
        spec.prepare(Value::from(3)),
        Err(Error::KindMismatch { .. })
    ));
}

#[test]
fn test_prepare_checks_terminal_kind() {
    let spec = TypeSpec::parse("List<Integer>").expect("spec");
    assert!(spec.prepare(Value::from(1)).is_ok());
    assert!(spec.prepare(Value::from(1i64)).is_err());

    let map = TypeSpec::parse("Map<String, Integer>").expect("spec");
    assert!(map.prepare_key(Value::from("k")).is_ok());
    assert!(map.prepare_key(Value::from(1)).is_err());
}

#[test]
fn test_should_emit_binary() {
    let optional = TypeSpec::parse("Optional<String>").expect("spec");
    assert!(!optional.should_emit_binary(&PropertyValue::Single(None)));
    assert!(optional.should_emit_binary(&PropertyValue::Single(Some(Value::from("x")))));

    let variable = TypeSpec::parse("Variable<Optional<String>>").expect("spec");
    assert!(!variable.should_emit_binary(&PropertyValue::Single(None)));

    let list = TypeSpec::parse("List<String>").expect("spec");
    assert!(list.should_emit_binary(&PropertyValue::List(Vec::new())));
}
