// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::binary::{as_map, field, int};
use crate::caching::{CacheKey, Wrapped};
use crate::config::{CodecOptions, EXTENSIONS_TAG, TYPE_TAG, VALUE_TAG};
use crate::error::Error;
use crate::extension::{ExtensibleType, ExtensionRegistry};
use crate::runtime::Runtime;
use crate::schema::{ObjectBuilder, ObjectSchema};
use crate::value::{FilePath, Value, ValueMap};
use ciborium::value::Value as Cbor;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

fn aaa_schema() -> Arc<ObjectSchema> {
    ObjectSchema::builder(-10010, "Aaa")
        .property(1, "stringField", "String")
        .property(2, "wrappedField", "Wrapped<String>")
        .property(3, "listField", "List<String>")
        .build()
        .expect("Aaa schema")
}

fn runtime() -> Runtime {
    let item = ObjectSchema::builder(-2, "Item")
        .property(1, "name", "String")
        .build()
        .expect("Item schema");
    let holder = ObjectSchema::builder(-3, "Holder")
        .property(1, "first", "Item")
        .property(2, "second", "Optional<Item>")
        .property(3, "items", "List<Item>")
        .build()
        .expect("Holder schema");
    let mixed = ObjectSchema::builder(-4, "Mixed")
        .property(1, "note", "Optional<String>")
        .property(2, "weights", "Map<String, Integer>")
        .property(3, "id", "Uuid")
        .property(4, "asset", "FilePath")
        .property(5, "mesh", "Wrapped<String>")
        .property(6, "level", "Variable<Double>")
        .property(7, "count", "Long")
        .property(8, "ratio", "Float")
        .property(9, "enabled", "Boolean")
        .build()
        .expect("Mixed schema");
    let node = ObjectSchema::builder(-5, "LNode")
        .late_deserializable()
        .property(1, "name", "Variable<String>")
        .property(2, "next", "Variable<Optional<LNode>>")
        .build()
        .expect("LNode schema");

    Runtime::builder()
        .schema(aaa_schema())
        .schema(item)
        .schema(holder)
        .schema(mixed)
        .schema(node)
        .build()
        .expect("runtime")
}

fn build_aaa(runtime: &Runtime) -> Arc<crate::schema::HanaObject> {
    let mut builder = runtime.new_builder("Aaa").expect("Aaa builder");
    builder
        .set("stringField", "x")
        .expect("stringField")
        .set("wrappedField", "y")
        .expect("wrappedField")
        .add("listField", ["p", "q"])
        .expect("listField");
    builder.build().expect("Aaa")
}

fn item(runtime: &Runtime, name: &str) -> Value {
    let mut builder = runtime.new_builder("Item").expect("Item builder");
    builder.set("name", name).expect("name");
    Value::Object(builder.build().expect("Item"))
}

fn mixed(runtime: &Runtime) -> Value {
    let key = CacheKey::builder("mesh")
        .string("cube")
        .file_path(FilePath::absolute("/assets/cube.obj"))
        .build()
        .expect("cache key");
    let mut builder = runtime.new_builder("Mixed").expect("Mixed builder");
    builder
        .put("weights", "a", 1)
        .expect("a")
        .put("weights", "b", 2)
        .expect("b")
        .set("id", Uuid::new_v4())
        .expect("id")
        .set("asset", FilePath::absolute("/assets/tex.png"))
        .expect("asset")
        .set("mesh", Wrapped::cached(key))
        .expect("mesh")
        .set("level", 0.5)
        .expect("level")
        .set("count", 1i64 << 40)
        .expect("count")
        .set("ratio", 0.25f32)
        .expect("ratio")
        .set("enabled", true)
        .expect("enabled");
    Value::Object(builder.build().expect("Mixed"))
}

fn assert_same_fields(a: &Value, b: &Value) {
    let a = a.as_object().expect("object a");
    let b = b.as_object().expect("object b");
    assert_eq!(a.schema().name(), b.schema().name());
    for property in a.schema().properties() {
        assert_eq!(
            a.property(property.name()).expect("a property"),
            b.property(property.name()).expect("b property"),
            "property '{}' differs",
            property.name()
        );
    }
}

// ============================================================================
// Readable
// ============================================================================

#[test]
fn test_readable_concrete_scenario() {
    let runtime = runtime();
    let aaa = build_aaa(&runtime);

    let tree = runtime.to_tree(&Value::Object(aaa)).expect("serialize");
    assert_eq!(tree["type"], json!("Aaa"));
    assert_eq!(
        tree["children"],
        json!([
            {"func": "stringField", "type": "String", "value": "x"},
            {"func": "wrappedField", "type": "Direct", "value": {"type": "String", "value": "y"}},
            {"func": "listField", "type": "String", "value": "p"},
            {"func": "listField", "type": "String", "value": "q"}
        ])
    );
    assert!(tree["id"].is_string());

    let back = runtime.from_tree(&tree).expect("deserialize");
    let back = back.as_object().expect("object");
    assert_eq!(back.value("stringField").expect("string"), Some(Value::from("x")));
    assert_eq!(
        back.value("wrappedField").expect("wrapped"),
        Some(Value::Wrapped(Wrapped::direct("y")))
    );
    assert_eq!(
        back.list("listField").expect("list"),
        vec![Value::from("p"), Value::from("q")]
    );
}

#[test]
fn test_readable_identity_dedup() {
    let runtime = runtime();
    let shared = item(&runtime, "shared");
    let mut builder = runtime.new_builder("Holder").expect("Holder builder");
    builder
        .set("first", shared.clone())
        .expect("first")
        .set("second", shared)
        .expect("second");
    let holder = Value::Object(builder.build().expect("Holder"));

    let tree = runtime.to_tree(&holder).expect("serialize");
    let children = tree["children"].as_array().expect("children");
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["type"], json!("Item"));
    assert_eq!(children[1]["type"], json!("__lookup__"));
    assert_eq!(children[0]["id"], children[1]["id"]);

    let back = runtime.from_tree(&tree).expect("deserialize");
    let back = back.as_object().expect("object");
    assert_eq!(
        back.value("first").expect("first"),
        back.value("second").expect("second")
    );
}

#[test]
fn test_readable_skips_unknown_func() {
    let runtime = runtime();
    let tree = json!({
        "type": "Aaa",
        "children": [
            {"func": "stringField", "type": "String", "value": "x"},
            {"func": "removedField", "type": "Integer", "value": 3},
            {"func": "wrappedField", "type": "Direct", "value": {"type": "String", "value": "y"}},
            {"func": "listField", "type": "String", "value": "p"}
        ]
    });
    let back = runtime.from_tree(&tree).expect("deserialize");
    let back = back.as_object().expect("object");
    assert_eq!(back.value("stringField").expect("string"), Some(Value::from("x")));
    assert_eq!(back.list("listField").expect("list"), vec![Value::from("p")]);
}

#[test]
fn test_readable_unknown_lookup_fails() {
    let runtime = runtime();
    let tree = json!({
        "type": "Holder",
        "children": [{"func": "first", "type": "__lookup__", "id": Uuid::new_v4().to_string()}]
    });
    assert!(matches!(runtime.from_tree(&tree), Err(Error::UnknownLookup(_))));
}

#[test]
fn test_readable_round_trip_mixed() {
    let runtime = runtime();
    let value = mixed(&runtime);
    let text = runtime.to_readable(&value).expect("serialize");
    let back = runtime.from_readable(&text).expect("deserialize");
    assert_same_fields(&value, &back);
}

#[test]
fn test_readable_optional_absent_is_omitted() {
    let runtime = runtime();
    let mut builder = runtime.new_builder("Holder").expect("Holder builder");
    builder.set("first", item(&runtime, "only")).expect("first");
    let tree = runtime
        .to_tree(&Value::Object(builder.build().expect("Holder")))
        .expect("serialize");
    let funcs: Vec<_> = tree["children"]
        .as_array()
        .expect("children")
        .iter()
        .map(|c| c["func"].clone())
        .collect();
    assert_eq!(funcs, vec![json!("first")]);

    let back = runtime.from_tree(&tree).expect("deserialize");
    let back = back.as_object().expect("object");
    assert_eq!(back.value("second").expect("second"), None);
    assert!(back.list("items").expect("items").is_empty());
}

#[test]
fn test_readable_non_finite_floats() {
    let runtime = runtime();
    for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let tree = runtime.to_tree(&Value::Double(x)).expect("encode double");
        assert!(tree["value"].is_string(), "{} encoded as {}", x, tree["value"]);
        let back = runtime.from_tree(&tree).expect("decode double");
        let back = back.as_f64().expect("double");
        assert!(back == x || (x.is_nan() && back.is_nan()));
    }
    let tree = runtime.to_tree(&Value::Float(f32::NEG_INFINITY)).expect("encode float");
    assert_eq!(tree["value"], json!("-Infinity"));
    let back = runtime.from_tree(&tree).expect("decode float");
    assert_eq!(back.as_f32(), Some(f32::NEG_INFINITY));

    let value = mixed(&runtime);
    let object = value.as_object().expect("object");
    object.set("level", f64::NAN).expect("level");
    let text = runtime.to_readable(&value).expect("readable");
    assert!(text.contains("\"NaN\""));
    let back = runtime.from_readable(&text).expect("from readable");
    let level = back
        .as_object()
        .expect("object")
        .value("level")
        .expect("level")
        .and_then(|v| v.as_f64())
        .expect("double");
    assert!(level.is_nan());
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn test_binary_round_trip_aaa() {
    let runtime = runtime();
    let value = Value::Object(build_aaa(&runtime));
    let bytes = runtime.to_binary(&value).expect("serialize");
    let back = runtime.from_binary(&bytes).expect("deserialize");
    assert_same_fields(&value, &back);
}

#[test]
fn test_binary_round_trip_mixed() {
    let runtime = runtime();
    let value = mixed(&runtime);
    let bytes = runtime.to_binary(&value).expect("serialize");
    let back = runtime.from_binary(&bytes).expect("deserialize");
    assert_same_fields(&value, &back);
}

#[test]
fn test_binary_entry_count_and_omission() {
    let runtime = runtime();
    let mut builder = runtime.new_builder("Holder").expect("Holder builder");
    builder
        .set("first", item(&runtime, "a"))
        .expect("first")
        .add("items", [item(&runtime, "b")])
        .expect("items");
    let holder = Value::Object(builder.build().expect("Holder"));

    let unit = runtime
        .binary_serializer(CodecOptions::default())
        .serialize(&holder)
        .expect("serialize");
    let unit = as_map(&unit, "unit").expect("unit map");
    let content = as_map(field(unit, VALUE_TAG).expect("value"), "content").expect("content map");
    // first, items, extension list; the absent optional is not written
    assert_eq!(content.len(), 3);
    assert!(field(content, 2).is_none());
    assert!(field(content, EXTENSIONS_TAG).is_some());

    let back = runtime.from_binary(&runtime.to_binary(&holder).expect("bytes")).expect("deserialize");
    let back = back.as_object().expect("object");
    assert_eq!(back.value("second").expect("second"), None);
    assert_eq!(back.list("items").expect("items").len(), 1);
}

#[test]
fn test_binary_identity_dedup() {
    let runtime = runtime();
    let shared = item(&runtime, "shared");
    let mut builder = runtime.new_builder("Holder").expect("Holder builder");
    builder
        .set("first", shared.clone())
        .expect("first")
        .add("items", [shared.clone(), shared])
        .expect("items");
    let holder = Value::Object(builder.build().expect("Holder"));

    let back = runtime
        .from_binary(&runtime.to_binary(&holder).expect("serialize"))
        .expect("deserialize");
    let back = back.as_object().expect("object");
    let first = back.value("first").expect("first").expect("present");
    let items = back.list("items").expect("items");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| *i == first));
}

#[test]
fn test_binary_skips_unknown_property_id() {
    let runtime = runtime();
    let string_unit = |s: &str| {
        Cbor::Map(vec![
            (int(TYPE_TAG), int(30006)),
            (int(VALUE_TAG), Cbor::Text(s.into())),
        ])
    };
    let unit = Cbor::Map(vec![
        (int(TYPE_TAG), int(-10010)),
        (
            int(VALUE_TAG),
            Cbor::Map(vec![
                (int(1), string_unit("x")),
                (int(42), string_unit("from a newer schema")),
                (int(2), Cbor::Map(vec![
                    (int(TYPE_TAG), int(30021)),
                    (int(VALUE_TAG), string_unit("y")),
                ])),
                (int(3), Cbor::Array(vec![string_unit("p")])),
            ]),
        ),
    ]);
    let back = runtime
        .binary_deserializer(CodecOptions::default())
        .deserialize(&unit)
        .expect("deserialize");
    let back = back.as_object().expect("object");
    assert_eq!(back.value("stringField").expect("string"), Some(Value::from("x")));
    assert_eq!(back.list("listField").expect("list"), vec![Value::from("p")]);
}

#[test]
fn test_binary_list_shape_error() {
    let runtime = runtime();
    let unit = Cbor::Map(vec![
        (int(TYPE_TAG), int(-10010)),
        (
            int(VALUE_TAG),
            Cbor::Map(vec![(int(3), Cbor::Text("not a list".into()))]),
        ),
    ]);
    let result = runtime
        .binary_deserializer(CodecOptions::default())
        .deserialize(&unit);
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn test_unset_terminal_fails_to_serialize() {
    let runtime = runtime();
    let aaa = runtime.new_builder("Aaa").expect("builder").build().expect("Aaa");
    let result = runtime.to_binary(&Value::Object(aaa));
    assert!(matches!(result, Err(Error::MissingValue(p)) if p == "stringField"));
}

#[test]
fn test_unregistered_schema_fails_to_serialize() {
    let runtime = runtime();
    let stray = ObjectSchema::builder(-99, "Stray").build().expect("schema");
    let registry = Arc::new(ExtensionRegistry::builder().build().expect("registry"));
    let object = ObjectBuilder::new(stray, registry).build().expect("object");
    assert!(matches!(
        runtime.to_binary(&Value::Object(object)),
        Err(Error::UnknownTypeId(-99))
    ));
}

// ============================================================================
// Late deserializable
// ============================================================================

fn linked_node(runtime: &Runtime) -> Value {
    let node = runtime.new_builder("LNode").expect("builder").build().expect("node");
    node.set("name", "loop").expect("name");
    node.set("next", Value::Object(Arc::clone(&node))).expect("next");
    Value::Object(node)
}

#[test]
fn test_late_cycle_round_trips_binary() {
    let runtime = runtime();
    let value = linked_node(&runtime);
    let back = runtime
        .from_binary(&runtime.to_binary(&value).expect("serialize"))
        .expect("deserialize");
    let node = back.as_object().expect("object");
    assert_eq!(node.value("name").expect("name"), Some(Value::from("loop")));
    assert_eq!(node.value("next").expect("next"), Some(back.clone()));
}

#[test]
fn test_late_cycle_round_trips_readable() {
    let runtime = runtime();
    let value = linked_node(&runtime);
    let back = runtime
        .from_readable(&runtime.to_readable(&value).expect("serialize"))
        .expect("deserialize");
    let node = back.as_object().expect("object");
    assert_eq!(node.value("next").expect("next"), Some(back.clone()));
}

#[test]
fn test_late_extension_round_trip() {
    let note = ObjectSchema::builder(-7, "Note")
        .late_deserializable()
        .property(1, "text", "Variable<String>")
        .property(2, "tags", "Variable<List<String>>")
        .build()
        .expect("Note");
    let runtime = Runtime::builder()
        .schema(aaa_schema())
        .schema(note)
        .late_extension(ExtensibleType::new("Aaa"), "Note")
        .build()
        .expect("runtime");

    let aaa = build_aaa(&runtime);
    let ext = aaa.get_object_extension(-7).expect("Note extension");
    ext.set("text", "hello").expect("text");
    ext.variable("tags")
        .expect("tags")
        .modify(|tags| {
            if let crate::value::PropertyValue::List(items) = tags {
                items.push(Value::from("t"));
            }
        });
    let value = Value::Object(aaa);

    for back in [
        runtime.from_binary(&runtime.to_binary(&value).expect("binary")).expect("from binary"),
        runtime.from_readable(&runtime.to_readable(&value).expect("readable")).expect("from readable"),
    ] {
        let back = back.as_object().expect("object");
        let key = crate::extension::CapabilityKey::schema(-7);
        assert!(back.has_extension(&key));
        let note = back.get_object_extension(-7).expect("note");
        assert_eq!(note.value("text").expect("text"), Some(Value::from("hello")));
        assert_eq!(note.list("tags").expect("tags"), vec![Value::from("t")]);
    }
}

#[test]
fn test_unknown_extension_type_is_skipped() {
    let runtime = runtime();
    let tree = json!({
        "type": "Item",
        "children": [{"func": "name", "type": "String", "value": "n"}],
        "extensions": [{"type": "RetiredExtension", "children": []}]
    });
    let back = runtime.from_tree(&tree).expect("deserialize");
    assert!(back.as_object().expect("object").extensions().is_empty());
}

#[test]
fn test_extension_written_earlier_is_adopted_from_lookup() {
    let note = ObjectSchema::builder(-7, "Note")
        .late_deserializable()
        .property(1, "text", "Variable<String>")
        .build()
        .expect("Note");
    let doc = ObjectSchema::builder(-8, "Doc")
        .property(1, "pinned", "Variable<Optional<Note>>")
        .build()
        .expect("Doc");
    let runtime = Runtime::builder()
        .schema(note)
        .schema(doc)
        .late_extension(ExtensibleType::new("Doc"), "Note")
        .build()
        .expect("runtime");

    let doc = runtime.new_builder("Doc").expect("Doc builder").build().expect("Doc");
    let note = doc.get_object_extension(-7).expect("note");
    note.set("text", "pinned note").expect("text");
    doc.set("pinned", Arc::clone(&note)).expect("pinned");
    let value = Value::Object(doc);

    let tree = runtime.to_tree(&value).expect("tree");
    assert_eq!(tree["extensions"][0]["type"], json!("__lookup__"));

    for back in [
        runtime.from_binary(&runtime.to_binary(&value).expect("binary")).expect("from binary"),
        runtime.from_tree(&tree).expect("from tree"),
    ] {
        let back = back.as_object().expect("object");
        assert_eq!(back.extensions().len(), 1);
        let pinned = back.value("pinned").expect("pinned").expect("present");
        let pinned = pinned.as_object().expect("note object");
        let ext = back.get_object_extension(-7).expect("note extension");
        assert!(Arc::ptr_eq(pinned, &ext));
        assert_eq!(ext.value("text").expect("text"), Some(Value::from("pinned note")));
    }
}

#[test]
fn test_extension_lookup_to_unknown_id_fails() {
    let runtime = runtime();
    let missing = Uuid::new_v4();

    let tree = json!({
        "type": "Item",
        "children": [{"func": "name", "type": "String", "value": "n"}],
        "extensions": [{"type": "__lookup__", "id": missing.to_string()}]
    });
    assert!(matches!(runtime.from_tree(&tree), Err(Error::UnknownLookup(_))));

    let unit = Cbor::Map(vec![
        (int(TYPE_TAG), int(-2)),
        (
            int(VALUE_TAG),
            Cbor::Map(vec![
                (int(1), Cbor::Map(vec![
                    (int(TYPE_TAG), int(30006)),
                    (int(VALUE_TAG), Cbor::Text("n".into())),
                ])),
                (int(EXTENSIONS_TAG), Cbor::Array(vec![Cbor::Map(vec![
                    (int(TYPE_TAG), int(crate::config::TYPE_ID_LOOKUP.into())),
                    (int(VALUE_TAG), Cbor::Bytes(missing.as_bytes().to_vec())),
                ])])),
            ]),
        ),
    ]);
    let result = runtime
        .binary_deserializer(CodecOptions::default())
        .deserialize(&unit);
    assert!(matches!(result, Err(Error::UnknownLookup(_))));
}

// ============================================================================
// Registry and options
// ============================================================================

#[test]
fn test_registry_rejects_reserved_and_duplicate_ids() {
    let clash = ObjectSchema::builder(30001, "NotAnInteger").build().expect("schema");
    assert!(matches!(
        Runtime::builder().schema(clash).build(),
        Err(Error::DuplicateTypeId(30001))
    ));

    let lookup = ObjectSchema::builder(-1, "__lookup__").build().expect("schema");
    assert!(matches!(
        Runtime::builder().schema(lookup).build(),
        Err(Error::DuplicateTypeName(_))
    ));
}

#[test]
fn test_relative_file_path_uses_options() {
    let runtime = runtime();
    let mut builder = runtime.new_builder("Mixed").expect("builder");
    builder
        .set("asset", FilePath::relative("/data/scenes/tex/a.png"))
        .expect("asset")
        .set("id", Uuid::nil())
        .expect("id")
        .set("mesh", "inline")
        .expect("mesh")
        .set("level", 1.0)
        .expect("level")
        .set("count", 0i64)
        .expect("count")
        .set("ratio", 1.0f32)
        .expect("ratio")
        .set("enabled", false)
        .expect("enabled");
    let value = Value::Object(builder.build().expect("Mixed"));

    let tree = runtime
        .readable_serializer(CodecOptions::for_file("/data/scenes/main.json"))
        .to_tree(&value)
        .expect("serialize");
    let asset = tree["children"]
        .as_array()
        .expect("children")
        .iter()
        .find(|c| c["func"] == json!("asset"))
        .expect("asset child")
        .clone();
    assert_eq!(asset["value"], json!("tex/a.png"));
    assert_eq!(asset["relative"], json!(true));

    let back = runtime
        .readable_deserializer(CodecOptions::for_file("/data/scenes/main.json"))
        .from_tree(&tree)
        .expect("deserialize");
    assert_eq!(
        back.as_object().expect("object").value("asset").expect("asset"),
        Some(Value::FilePath(FilePath::relative("/data/scenes/tex/a.png")))
    );
}

#[test]
fn test_map_round_trip_keeps_entries() {
    let runtime = runtime();
    let value = mixed(&runtime);
    let back = runtime
        .from_binary(&runtime.to_binary(&value).expect("serialize"))
        .expect("deserialize");
    let expected: ValueMap = [("a", 1), ("b", 2)].into_iter().collect();
    assert!(back
        .as_object()
        .expect("object")
        .map("weights")
        .expect("weights")
        .same_entries(&expected));
}
