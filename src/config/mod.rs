// src/config/mod.rs

//! Configuration loading and validation for devtasks.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate the loaded values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_or_default, project_root,
};
pub use model::{
    ChangelogSection, ChecksSection, ConfigFile, RawConfigFile, ReleaseSection,
    UnasyncSection, WatchSection,
};
