// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod manifest;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::Path;

use tracing::{debug, error};

use crate::cli::{CliArgs, TaskCommand};
use crate::config::{load_or_default, project_root, ConfigFile};
use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::fs::RealFileSystem;
use crate::tasks::TaskContext;
use crate::watch::NotifySource;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (or defaults)
/// - the shell command runner and real filesystem
/// - the selected task
/// - (for `watch_tests`) the `notify` change source and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.as_deref().map(Path::new);
    let cfg = load_or_default(config_path)?;
    let root = project_root(config_path);

    let runner = ShellRunner::new();
    let fs = RealFileSystem;
    let ctx = TaskContext::new(&cfg, &runner, &fs, root);

    if args.dry_run {
        print_dry_run(args.task, &ctx);
        return Ok(());
    }

    debug!(task = ?args.task, root = ?ctx.root, "running task");

    match args.task {
        TaskCommand::Test => tasks::test(&ctx).await,
        TaskCommand::UnitTests => tasks::unit_tests(&ctx).await,
        TaskCommand::WatchTests => {
            let cwd = std::env::current_dir()?;
            let mut source = NotifySource::new();
            tasks::watch_tests(&ctx, &mut source, &cwd, ctrl_c()).await?;
            Ok(())
        }
        TaskCommand::Release => tasks::release(&ctx).await.map(|_| ()),
        TaskCommand::MakeChangelog => {
            let today = chrono::Local::now().date_naive();
            tasks::make_changelog(&ctx, today).map(|_| ())
        }
        TaskCommand::Unasync => tasks::unasync(&ctx).await,
    }
}

/// Resolves on the first Ctrl-C. If the signal handler cannot be installed
/// it never resolves and the process has to be killed the hard way.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Dry-run output: resolved config plus the steps of the selected task.
fn print_dry_run(task: TaskCommand, ctx: &TaskContext<'_>) {
    let cfg: &ConfigFile = ctx.config;

    println!("devtasks dry-run");
    println!("  root = {}", ctx.root.display());
    println!("  env = {:?}", cfg.env());
    println!("  watch.ignore = {:?}", cfg.watch().ignore);
    println!("  release.manifest = {}", ctx.manifest_path().display());
    println!("  release.remote = {}", cfg.release().remote);
    println!("  changelog.path = {}", ctx.changelog_path().display());
    println!();

    println!("{task:?}:");
    for step in tasks::planned_steps(task, ctx) {
        println!("  - {step}");
    }

    debug!("dry-run complete (no execution)");
}
