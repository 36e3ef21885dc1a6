// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code

//! Writes scenes to disk with both codecs and reads them back.

use hana::file::{read_binary, read_readable, write_binary, write_readable};
use hana::{CacheKey, FilePath, ObjectSchema, Runtime, Value, Wrapped};
use std::fs;

fn runtime() -> Runtime {
    let texture = ObjectSchema::builder(-20, "Texture")
        .property(1, "source", "FilePath")
        .property(2, "pixels", "Wrapped<String>")
        .build()
        .expect("Texture schema");
    let scene = ObjectSchema::builder(-21, "Scene")
        .alias("World")
        .property(1, "title", "String")
        .property(2, "textures", "List<Texture>")
        .property(3, "primary", "Optional<Texture>")
        .property(4, "exposure", "Variable<Double>")
        .property(5, "tags", "Map<String, Boolean>")
        .build()
        .expect("Scene schema");
    Runtime::builder()
        .schema(texture)
        .schema(scene)
        .build()
        .expect("runtime")
}

fn texture(runtime: &Runtime, source: FilePath, pixels: Wrapped) -> Value {
    let mut builder = runtime.new_builder("Texture").expect("Texture builder");
    builder
        .set("source", source)
        .expect("source")
        .set("pixels", pixels)
        .expect("pixels");
    Value::Object(builder.build().expect("Texture"))
}

fn scene(runtime: &Runtime, dir: &std::path::Path) -> Value {
    let relative = FilePath::relative(dir.join("textures/wood.png").to_string_lossy());
    let key = CacheKey::builder("image")
        .file_path(FilePath::absolute("/library/stone.png"))
        .string("mip0")
        .build()
        .expect("cache key");
    let wood = texture(runtime, relative, Wrapped::direct("inline pixels"));
    let stone = texture(runtime, FilePath::absolute("/library/stone.png"), Wrapped::cached(key));

    let mut builder = runtime.new_builder("World").expect("Scene builder by alias");
    builder
        .set("title", "courtyard")
        .expect("title")
        .add("textures", [wood.clone(), stone])
        .expect("textures")
        .set("primary", wood)
        .expect("primary")
        .set("exposure", 1.5)
        .expect("exposure")
        .put("tags", "outdoor", true)
        .expect("tags");
    Value::Object(builder.build().expect("Scene"))
}

fn assert_scene(back: &Value, dir: &std::path::Path) {
    let scene = back.as_object().expect("scene object");
    assert_eq!(scene.schema().name(), "Scene");
    assert_eq!(scene.value("title").expect("title"), Some(Value::from("courtyard")));
    assert_eq!(scene.value("exposure").expect("exposure"), Some(Value::from(1.5)));

    let textures = scene.list("textures").expect("textures");
    assert_eq!(textures.len(), 2);
    // primary was the same instance as the first texture
    assert_eq!(scene.value("primary").expect("primary"), Some(textures[0].clone()));

    let wood = textures[0].as_object().expect("wood");
    assert_eq!(
        wood.value("source").expect("source"),
        Some(Value::FilePath(FilePath::relative(
            dir.join("textures/wood.png").to_string_lossy()
        )))
    );
    let stone = textures[1].as_object().expect("stone");
    let pixels = stone.value("pixels").expect("pixels").expect("present");
    let key = pixels
        .as_wrapped()
        .and_then(|w| w.as_cached())
        .expect("cached pixels");
    assert_eq!(key.protocol(), "image");

    let tags = scene.map("tags").expect("tags");
    assert_eq!(tags.get(&Value::from("outdoor")), Some(&Value::from(true)));
}

#[test]
fn test_binary_file_round_trip() {
    let runtime = runtime();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scene.bin");

    let value = scene(&runtime, dir.path());
    write_binary(&runtime, &path, &value).expect("write");
    let back = read_binary(&runtime, &path).expect("read");
    assert_scene(&back, dir.path());
}

#[test]
fn test_readable_file_round_trip() {
    let runtime = runtime();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scene.json");

    let value = scene(&runtime, dir.path());
    write_readable(&runtime, &path, &value).expect("write");

    let text = fs::read_to_string(&path).expect("text");
    assert!(text.contains("\"textures/wood.png\""), "relative path kept relative: {}", text);
    assert!(!text.contains(&*dir.path().to_string_lossy()));

    let back = read_readable(&runtime, &path).expect("read");
    assert_scene(&back, dir.path());
}

#[test]
fn test_missing_file_is_io_error() {
    let runtime = runtime();
    let dir = tempfile::tempdir().expect("tempdir");
    let result = read_binary(&runtime, dir.path().join("absent.bin"));
    assert!(matches!(result, Err(hana::Error::Io(_))));
}

#[test]
fn test_corrupt_binary_file_is_rejected() {
    let runtime = runtime();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("garbage.bin");
    fs::write(&path, [0xff, 0x00, 0x13, 0x37]).expect("write garbage");
    assert!(read_binary(&runtime, &path).is_err());
}
