#![allow(dead_code)]

use devtasks::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.config.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config.env.clear();
        self
    }

    pub fn hooks(mut self, cmd: &str) -> Self {
        self.config.checks.hooks = cmd.to_string();
        self
    }

    pub fn type_check(mut self, cmd: &str) -> Self {
        self.config.checks.type_check = cmd.to_string();
        self
    }

    pub fn unit_tests(mut self, cmd: &str) -> Self {
        self.config.checks.unit_tests = cmd.to_string();
        self
    }

    pub fn ignore(mut self, fragments: &[&str]) -> Self {
        self.config.watch.ignore = fragments.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn manifest(mut self, path: &str) -> Self {
        self.config.release.manifest = path.to_string();
        self
    }

    pub fn remote(mut self, remote: &str) -> Self {
        self.config.release.remote = remote.to_string();
        self
    }

    pub fn changelog(mut self, path: &str) -> Self {
        self.config.changelog.path = path.to_string();
        self
    }

    pub fn repo_link(mut self, link: &str) -> Self {
        self.config.changelog.repo_link = link.to_string();
        self
    }

    pub fn unasync(mut self, generate: &str, format: &str) -> Self {
        self.config.unasync.generate = generate.to_string();
        self.config.unasync.format = format.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
