// src/tasks/checks.rs

//! `test` and `unit_tests`.

use std::fmt;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::errors::{DevtasksError, Result};
use crate::types::{CommandOutcome, EnvOverrides};

use super::TaskContext;

/// One independently run check of the aggregate `test` task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Hooks,
    TypeCheck,
    UnitTests,
}

impl Stage {
    /// Execution order.
    pub const ALL: [Stage; 3] = [Stage::Hooks, Stage::TypeCheck, Stage::UnitTests];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Hooks => "Pre commit hooks",
            Stage::TypeCheck => "Type check",
            Stage::UnitTests => "Unit tests",
        }
    }

    pub fn command(self, cfg: &ConfigFile) -> &str {
        match self {
            Stage::Hooks => &cfg.checks().hooks,
            Stage::TypeCheck => &cfg.checks().type_check,
            Stage::UnitTests => &cfg.checks().unit_tests,
        }
    }

    /// Only the unit tests talk to the local emulator.
    pub fn env(self, cfg: &ConfigFile) -> Option<&EnvOverrides> {
        match self {
            Stage::UnitTests => Some(cfg.env()),
            Stage::Hooks | Stage::TypeCheck => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of every stage, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub results: Vec<(Stage, CommandOutcome)>,
}

impl CheckReport {
    pub fn failed_stages(&self) -> Vec<Stage> {
        self.results
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(stage, _)| *stage)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed_stages().is_empty()
    }

    /// Number of failed stages; 0 when everything passed.
    pub fn exit_code(&self) -> i32 {
        self.failed_stages().len() as i32
    }
}

/// Run all stages in order. A failing stage never stops the later ones.
pub async fn run_checks(ctx: &TaskContext<'_>) -> CheckReport {
    let mut report = CheckReport::default();

    for stage in Stage::ALL {
        let outcome = ctx
            .runner
            .run(stage.command(ctx.config), stage.env(ctx.config))
            .await;
        debug!(%stage, exit_code = outcome.code(), "stage finished");
        report.results.push((stage, outcome));
    }

    report
}

/// The `test` task: fails with the list of failed stages.
pub async fn test(ctx: &TaskContext<'_>) -> Result<()> {
    let report = run_checks(ctx).await;

    if report.is_success() {
        info!("all checks passed");
        return Ok(());
    }

    let failed = report
        .failed_stages()
        .into_iter()
        .map(|stage| stage.label().to_string())
        .collect();
    Err(DevtasksError::StagesFailed(failed))
}

/// The `unit_tests` task: the test command's status is the task's status.
pub async fn unit_tests(ctx: &TaskContext<'_>) -> Result<()> {
    let stage = Stage::UnitTests;
    let cmd = stage.command(ctx.config);

    match ctx.runner.run(cmd, stage.env(ctx.config)).await {
        CommandOutcome::Success => Ok(()),
        CommandOutcome::Failed(code) => Err(DevtasksError::CommandFailed {
            cmd: cmd.to_string(),
            code,
        }),
    }
}
