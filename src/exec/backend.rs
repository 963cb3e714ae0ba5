// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! Tasks talk to a `CommandRunner` instead of spawning processes directly.
//! Failure is data here: a command that cannot be found, crashes or exits
//! non-zero all come back as [`CommandOutcome::Failed`], and the caller
//! decides what that means.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::types::{CommandOutcome, EnvOverrides};

/// Width of the `=` rule printed before each command.
pub const SEPARATOR_WIDTH: usize = 79;

pub type RunFuture<'a> = Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>>;

/// Trait abstracting how a shell command is executed.
///
/// Production code uses [`ShellRunner`]; tests can provide their own
/// implementation that records commands instead of spawning processes.
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` to completion with the caller's environment merged with
    /// `env`, and report its exit status.
    fn run<'a>(&'a self, cmd: &'a str, env: Option<&'a EnvOverrides>) -> RunFuture<'a>;
}

/// Runs commands through the platform shell with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run<'a>(&'a self, cmd: &'a str, env: Option<&'a EnvOverrides>) -> RunFuture<'a> {
        Box::pin(async move {
            println!("{}", "=".repeat(SEPARATOR_WIDTH));
            println!("> {cmd}");

            let mut command = shell_command(cmd);
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true);

            if let Some(env) = env {
                command.envs(env);
            }

            debug!(cmd, ?env, "spawning command");

            let status = match command.status().await {
                Ok(status) => status,
                Err(err) => {
                    error!(cmd, error = %err, "failed to run command");
                    return CommandOutcome::Failed(-1);
                }
            };

            let outcome = match status.code() {
                Some(code) => CommandOutcome::from_code(code),
                // Terminated by a signal.
                None => CommandOutcome::Failed(-1),
            };

            info!(cmd, exit_code = outcome.code(), "command exited");
            outcome
        })
    }
}

// Build a shell command appropriate for the platform.
fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}
