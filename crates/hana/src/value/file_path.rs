// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File path values that can be stored relative to the file they are saved in.

use std::path::{Component, Path};

/// A path plus the flag saying whether it is written relative to the
/// directory of the file being encoded.
///
/// The stored path is always the resolved one; relativisation happens only
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath {
    relative: bool,
    path: String,
}

impl FilePath {
    /// Path written verbatim.
    pub fn absolute(path: impl Into<String>) -> Self {
        Self {
            relative: false,
            path: path.into(),
        }
    }

    /// Path written relative to the encoded file's directory.
    pub fn relative(path: impl Into<String>) -> Self {
        Self {
            relative: true,
            path: path.into(),
        }
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Stored (resolved) path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path as it should appear on the wire.
    pub fn serialized_path(&self, base_dir: Option<&Path>) -> String {
        match base_dir {
            Some(dir) if self.relative => relativize(dir, &self.path),
            _ => self.path.clone(),
        }
    }

    /// Rebuild a path read from the wire.
    pub fn from_serialized(relative: bool, raw: &str, base_dir: Option<&Path>) -> Self {
        let path = match base_dir {
            Some(dir) if relative => normalize(&dir.join(raw)),
            _ => raw.to_string(),
        };
        Self { relative, path }
    }
}

/// Lexically normalize `path` (drop `.`, fold `..`) using `/` separators.
fn normalize(path: &Path) -> String {
    let mut root = String::new();
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => root.push_str(&p.as_os_str().to_string_lossy()),
            Component::RootDir => root.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(last) if last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if root.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{}{}", root, joined)
    }
}

/// Express `path` relative to `base_dir`.
fn relativize(base_dir: &Path, path: &str) -> String {
    let base = normalize(base_dir);
    if base == "." {
        return normalize(Path::new(path));
    }
    let target = normalize(Path::new(path));
    let base_parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    let target_parts: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
    if base.starts_with('/') != target.starts_with('/') {
        return target;
    }

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut out: Vec<&str> = vec![".."; base_parts.len() - common];
    out.extend_from_slice(&target_parts[common..]);
    if out.is_empty() {
        ".".to_string()
    } else {
        out.join("/")
    }
}
