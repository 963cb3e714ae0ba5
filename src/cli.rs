// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `devtasks`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devtasks",
    version,
    about = "Local development tasks: checks, test watcher, releases and changelog.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Devtasks.toml` in the current working directory. A missing
    /// default file means built-in defaults are used.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVTASKS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Print the resolved configuration and the commands the task would
    /// run, without executing anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub task: TaskCommand,
}

/// The named tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum TaskCommand {
    /// Run hook checks, the type checker and the unit tests.
    Test,

    /// Run only the unit tests.
    #[command(name = "unit_tests", visible_alias = "unit-tests")]
    UnitTests,

    /// Re-run the unit tests whenever a file under the current directory changes.
    #[command(name = "watch_tests", visible_alias = "watch-tests")]
    WatchTests,

    /// Tag the current commit with the manifest version and push the tag.
    Release,

    /// Insert a changelog section for the manifest version.
    #[command(name = "make_changelog", visible_alias = "make-changelog")]
    MakeChangelog,

    /// Regenerate the synchronous sources from the async ones, then reformat.
    Unasync,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
