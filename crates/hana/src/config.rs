// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hana wire constants - Single Source of Truth
//!
//! Every tag, reserved type id and readable field name used by the codecs
//! lives here. **NEVER hardcode them elsewhere!**
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: binary tags, reserved and built-in type ids, readable names
//! - **Level 2 (Per call)**: [`CodecOptions`] handed to each serializer/deserializer
//!
//! # Example
//!
//! ```
//! use hana::config::{CodecOptions, TYPE_TAG, VALUE_TAG};
//!
//! assert_ne!(TYPE_TAG, VALUE_TAG);
//! let options = CodecOptions::for_file("scenes/main.hana");
//! assert!(options.base_dir().is_some());
//! ```

use std::path::{Path, PathBuf};

// =======================================================================
// Binary unit tags
// =======================================================================

/// Map key holding the unit's type id.
pub const TYPE_TAG: i64 = 1;

/// Map key holding the unit's payload.
pub const VALUE_TAG: i64 = 2;

/// Map key holding the 16-byte surrogate id of a serializable unit.
pub const IDENTITY_TAG: i64 = 3;

/// Key of the extension list inside an object's content map.
///
/// Property ids are positive, so a negative tag never collides with them.
pub const EXTENSIONS_TAG: i64 = -1;

// =======================================================================
// Reserved type ids
// =======================================================================

/// Type id of a back-reference unit; `VALUE_TAG` holds the surrogate id bytes.
pub const TYPE_ID_LOOKUP: i32 = 10001;

/// Type id of a map entry unit; `VALUE_TAG` holds `[key unit, value unit]`.
pub const TYPE_ID_MAP_ENTRY: i32 = 10002;

// =======================================================================
// Built-in terminal type ids and names
// =======================================================================

pub const TYPE_ID_INTEGER: i32 = 30001;
pub const TYPE_ID_FLOAT: i32 = 30002;
pub const TYPE_ID_DOUBLE: i32 = 30003;
pub const TYPE_ID_LONG: i32 = 30004;
pub const TYPE_ID_BOOLEAN: i32 = 30005;
pub const TYPE_ID_STRING: i32 = 30006;
pub const TYPE_ID_UUID: i32 = 30017;
pub const TYPE_ID_FILE_PATH: i32 = 30020;
pub const TYPE_ID_DIRECT: i32 = 30021;
pub const TYPE_ID_CACHED: i32 = 30022;
pub const TYPE_ID_CACHE_KEY: i32 = 30023;

pub const TYPE_NAME_INTEGER: &str = "Integer";
pub const TYPE_NAME_FLOAT: &str = "Float";
pub const TYPE_NAME_DOUBLE: &str = "Double";
pub const TYPE_NAME_LONG: &str = "Long";
pub const TYPE_NAME_BOOLEAN: &str = "Boolean";
pub const TYPE_NAME_STRING: &str = "String";
pub const TYPE_NAME_UUID: &str = "Uuid";
pub const TYPE_NAME_FILE_PATH: &str = "FilePath";
pub const TYPE_NAME_DIRECT: &str = "Direct";
pub const TYPE_NAME_CACHED: &str = "Cached";
pub const TYPE_NAME_CACHE_KEY: &str = "CacheKey";

// =======================================================================
// Readable node vocabulary
// =======================================================================

/// `type` value of a back-reference node.
pub const TYPE_NAME_LOOKUP: &str = "__lookup__";

/// `type` value of a map entry node.
pub const TYPE_NAME_MAP_ENTRY: &str = "MapEntry";

pub const FIELD_TYPE: &str = "type";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_FUNC: &str = "func";
pub const FIELD_CHILDREN: &str = "children";
pub const FIELD_EXTENSIONS: &str = "extensions";
pub const FIELD_ID: &str = "id";
pub const FIELD_KEY: &str = "key";
pub const FIELD_RELATIVE: &str = "relative";
pub const FIELD_PROTOCOL: &str = "protocol";
pub const FIELD_PARTS: &str = "parts";

/// Readable spellings of non-finite `Float` and `Double` payloads.
pub const FLOAT_NAN: &str = "NaN";
pub const FLOAT_INFINITY: &str = "Infinity";
pub const FLOAT_NEG_INFINITY: &str = "-Infinity";

// =======================================================================
// Cache keys
// =======================================================================

/// Separator between the protocol and the tagged parts of a cache string key.
pub const CACHE_KEY_SEPARATOR: &str = "|||||";

/// Separator between a cache key part's tag and its value.
pub const CACHE_KEY_PART_SEPARATOR: &str = ":::";

// =======================================================================
// Per-call options
// =======================================================================

/// Options carried by one serializer or deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// File the encoded form is read from or written to.
    ///
    /// Relative [`FilePath`](crate::FilePath) values resolve against its directory.
    pub file_name: Option<PathBuf>,
}

impl CodecOptions {
    /// Options for data stored in `file_name`.
    pub fn for_file(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: Some(file_name.into()),
        }
    }

    /// Directory of the backing file, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.file_name.as_deref().map(|f| f.parent().unwrap_or(Path::new("")))
    }
}
