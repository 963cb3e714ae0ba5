// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DevtasksError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DevtasksError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_env(cfg)?;
    validate_commands(cfg)?;
    validate_ignore_list(cfg)?;
    validate_release(cfg)?;
    Ok(())
}

fn validate_env(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.env.keys() {
        if name.trim().is_empty() || name.contains('=') {
            return Err(DevtasksError::ConfigError(format!(
                "[env] contains an invalid variable name {name:?}"
            )));
        }
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    let commands = [
        ("checks.hooks", &cfg.checks.hooks),
        ("checks.type_check", &cfg.checks.type_check),
        ("checks.unit_tests", &cfg.checks.unit_tests),
        ("unasync.generate", &cfg.unasync.generate),
        ("unasync.format", &cfg.unasync.format),
    ];

    for (key, cmd) in commands {
        if cmd.trim().is_empty() {
            return Err(DevtasksError::ConfigError(format!(
                "[{key}] must not be an empty command"
            )));
        }
    }
    Ok(())
}

fn validate_ignore_list(cfg: &RawConfigFile) -> Result<()> {
    // An empty fragment is a substring of every path and would silence the watcher.
    if cfg.watch.ignore.iter().any(|s| s.is_empty()) {
        return Err(DevtasksError::ConfigError(
            "[watch].ignore must not contain an empty entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_release(cfg: &RawConfigFile) -> Result<()> {
    if cfg.release.remote.trim().is_empty() {
        return Err(DevtasksError::ConfigError(
            "[release].remote must not be empty".to_string(),
        ));
    }
    if cfg.release.manifest.trim().is_empty() {
        return Err(DevtasksError::ConfigError(
            "[release].manifest must not be empty".to_string(),
        ));
    }
    if cfg.changelog.path.trim().is_empty() {
        return Err(DevtasksError::ConfigError(
            "[changelog].path must not be empty".to_string(),
        ));
    }
    if cfg.changelog.repo_link.trim().is_empty() {
        return Err(DevtasksError::ConfigError(
            "[changelog].repo_link must not be empty".to_string(),
        ));
    }
    Ok(())
}
