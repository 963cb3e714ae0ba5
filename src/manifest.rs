// src/manifest.rs

//! Version lookup in the project manifest.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{DevtasksError, Result};
use crate::fs::FileSystem;

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn version_re() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(r#"version = "(.*?)""#).expect("valid version regex"))
}

/// First `version = "..."` value in `text`.
///
/// Matched anywhere in the document, on a single line, exactly like a
/// plain substring search would.
pub fn find_version(text: &str) -> Option<&str> {
    version_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Read the manifest at `path` and return its version string.
pub fn read_version(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let text = fs.read_to_string(path)?;
    find_version(&text)
        .map(str::to_string)
        .ok_or_else(|| DevtasksError::VersionNotFound(path.to_path_buf()))
}
