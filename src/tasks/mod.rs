// src/tasks/mod.rs

//! The named tasks exposed on the command line.
//!
//! Each task is a short sequence of external commands (through a
//! [`CommandRunner`]) and text-file edits (through a [`FileSystem`]). Both
//! are injected via [`TaskContext`] so tests can run every task without
//! touching the real machine.

pub mod changelog;
pub mod checks;
pub mod release;
pub mod unasync;

use std::path::{Path, PathBuf};

use crate::cli::TaskCommand;
use crate::config::ConfigFile;
use crate::exec::CommandRunner;
use crate::fs::FileSystem;

pub use changelog::{make_changelog, previous_version, render_changelog};
pub use checks::{run_checks, test, unit_tests, CheckReport, Stage};
pub use release::release;
pub use unasync::unasync;
pub use watch_tests::watch_tests;

/// Everything a task needs from the outside world.
pub struct TaskContext<'a> {
    pub config: &'a ConfigFile,
    pub runner: &'a dyn CommandRunner,
    pub fs: &'a dyn FileSystem,
    /// Directory that relative manifest/changelog paths resolve against.
    pub root: PathBuf,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        config: &'a ConfigFile,
        runner: &'a dyn CommandRunner,
        fs: &'a dyn FileSystem,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            runner,
            fs,
            root: root.into(),
        }
    }

    /// Resolve a configured path against the project root. Absolute paths
    /// are returned unchanged.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.config.release().manifest)
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.resolve(&self.config.changelog().path)
    }
}

/// Human-readable list of what `task` would do, used by `--dry-run`.
pub fn planned_steps(task: TaskCommand, ctx: &TaskContext<'_>) -> Vec<String> {
    let cfg = ctx.config;
    let env = env_prefix(cfg);

    match task {
        TaskCommand::Test => Stage::ALL
            .iter()
            .map(|stage| match stage {
                Stage::UnitTests => format!("{env}{}", stage.command(cfg)),
                _ => stage.command(cfg).to_string(),
            })
            .collect(),
        TaskCommand::UnitTests => vec![format!("{env}{}", cfg.checks().unit_tests)],
        TaskCommand::WatchTests => vec![format!(
            "on change (ignoring {:?}): {env}{}",
            cfg.watch().ignore,
            cfg.checks().unit_tests
        )],
        TaskCommand::Release => {
            let manifest = ctx.manifest_path();
            let version = crate::manifest::read_version(ctx.fs, &manifest)
                .unwrap_or_else(|_| "<version>".to_string());
            vec![
                format!("git tag {version}"),
                format!("git push {} {version}", cfg.release().remote),
            ]
        }
        TaskCommand::MakeChangelog => vec![format!(
            "rewrite {} using the version from {}",
            ctx.changelog_path().display(),
            ctx.manifest_path().display()
        )],
        TaskCommand::Unasync => vec![
            cfg.unasync().generate.clone(),
            cfg.unasync().format.clone(),
        ],
    }
}

fn env_prefix(cfg: &ConfigFile) -> String {
    cfg.env()
        .iter()
        .map(|(k, v)| format!("{k}={v} "))
        .collect()
}
