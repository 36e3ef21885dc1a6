// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File helpers around the codecs.
//!
//! Each helper sets [`CodecOptions::file_name`] to the target path, so
//! relative [`FilePath`](crate::FilePath) values are written relative to the
//! file's directory and resolved against it when read back.

use crate::config::CodecOptions;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::value::Value;
use std::fs;
use std::path::Path;

pub fn write_binary(runtime: &Runtime, path: impl AsRef<Path>, value: &Value) -> Result<()> {
    let path = path.as_ref();
    let bytes = runtime
        .binary_serializer(CodecOptions::for_file(path))
        .to_bytes(value)?;
    fs::write(path, bytes)?;
    log::debug!("[file] wrote binary {}", path.display());
    Ok(())
}

pub fn read_binary(runtime: &Runtime, path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    runtime
        .binary_deserializer(CodecOptions::for_file(path))
        .from_bytes(&bytes)
}

pub fn write_readable(runtime: &Runtime, path: impl AsRef<Path>, value: &Value) -> Result<()> {
    let path = path.as_ref();
    let text = runtime
        .readable_serializer(CodecOptions::for_file(path))
        .to_text(value)?;
    fs::write(path, text)?;
    log::debug!("[file] wrote readable {}", path.display());
    Ok(())
}

pub fn read_readable(runtime: &Runtime, path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    runtime
        .readable_deserializer(CodecOptions::for_file(path))
        .from_text(&text)
}
