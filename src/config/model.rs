// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::EnvOverrides;

/// Configuration as read from a `Devtasks.toml` file, before validation.
///
/// ```toml
/// [env]
/// FIRESTORE_EMULATOR_HOST = "127.0.0.1:8686"
///
/// [checks]
/// hooks = "pre-commit run --all-files"
/// type_check = "mypy firedantic"
/// unit_tests = "pytest"
///
/// [watch]
/// ignore = [".idea", ".pytest_cache", "__pycache__", ".git"]
///
/// [release]
/// manifest = "pyproject.toml"
/// remote = "origin"
///
/// [changelog]
/// path = "CHANGELOG.md"
/// repo_link = "https://github.com/ioxiocom/firedantic"
///
/// [unasync]
/// generate = "python unasync.py"
/// format = "poetry run black ."
/// ```
///
/// All sections are optional; an empty file yields the defaults above.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Environment overrides applied to unit-test runs.
    #[serde(default = "default_env")]
    pub env: EnvOverrides,

    #[serde(default)]
    pub checks: ChecksSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub release: ReleaseSection,

    #[serde(default)]
    pub changelog: ChangelogSection,

    #[serde(default)]
    pub unasync: UnasyncSection,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`], so every holder can assume the invariants
/// checked there.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    env: EnvOverrides,
    checks: ChecksSection,
    watch: WatchSection,
    release: ReleaseSection,
    changelog: ChangelogSection,
    unasync: UnasyncSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            env: raw.env,
            checks: raw.checks,
            watch: raw.watch,
            release: raw.release,
            changelog: raw.changelog,
            unasync: raw.unasync,
        }
    }

    pub fn env(&self) -> &EnvOverrides {
        &self.env
    }

    pub fn checks(&self) -> &ChecksSection {
        &self.checks
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn release(&self) -> &ReleaseSection {
        &self.release
    }

    pub fn changelog(&self) -> &ChangelogSection {
        &self.changelog
    }

    pub fn unasync(&self) -> &UnasyncSection {
        &self.unasync
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            env: default_env(),
            checks: ChecksSection::default(),
            watch: WatchSection::default(),
            release: ReleaseSection::default(),
            changelog: ChangelogSection::default(),
            unasync: UnasyncSection::default(),
        }
    }
}

fn default_env() -> EnvOverrides {
    let mut env = BTreeMap::new();
    env.insert(
        "FIRESTORE_EMULATOR_HOST".to_string(),
        "127.0.0.1:8686".to_string(),
    );
    env
}

/// `[checks]` section: the three stages of the `test` task.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecksSection {
    #[serde(default = "default_hooks")]
    pub hooks: String,

    #[serde(default = "default_type_check")]
    pub type_check: String,

    /// Also used by `unit_tests` and `watch_tests`.
    #[serde(default = "default_unit_tests")]
    pub unit_tests: String,
}

fn default_hooks() -> String {
    "pre-commit run --all-files".to_string()
}

fn default_type_check() -> String {
    "mypy firedantic".to_string()
}

fn default_unit_tests() -> String {
    "pytest".to_string()
}

impl Default for ChecksSection {
    fn default() -> Self {
        Self {
            hooks: default_hooks(),
            type_check: default_type_check(),
            unit_tests: default_unit_tests(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Substrings; any event path containing one of them is ignored.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_ignore() -> Vec<String> {
    [".idea", ".pytest_cache", "__pycache__", ".git"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

/// `[release]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSection {
    /// Manifest holding the `version = "..."` line, relative to the project root.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Remote the release tag is pushed to.
    #[serde(default = "default_remote")]
    pub remote: String,
}

fn default_manifest() -> String {
    "pyproject.toml".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for ReleaseSection {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            remote: default_remote(),
        }
    }
}

/// `[changelog]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogSection {
    #[serde(default = "default_changelog_path")]
    pub path: String,

    /// Base URL used for the `compare/` links.
    #[serde(default = "default_repo_link")]
    pub repo_link: String,
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

fn default_repo_link() -> String {
    "https://github.com/ioxiocom/firedantic".to_string()
}

impl Default for ChangelogSection {
    fn default() -> Self {
        Self {
            path: default_changelog_path(),
            repo_link: default_repo_link(),
        }
    }
}

/// `[unasync]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UnasyncSection {
    /// Generates the synchronous sources from the async ones.
    #[serde(default = "default_generate")]
    pub generate: String,

    /// Formatter run over the regenerated tree.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_generate() -> String {
    "python unasync.py".to_string()
}

fn default_format() -> String {
    "poetry run black .".to_string()
}

impl Default for UnasyncSection {
    fn default() -> Self {
        Self {
            generate: default_generate(),
            format: default_format(),
        }
    }
}
