// src/logging.rs

//! Diagnostics for `devtasks`, on stderr so stdout only carries the task
//! output (command echoes, test runner output, progress lines).
//!
//! Filtering is an [`EnvFilter`] built from two inputs:
//! - `--log-level` sets the base level for everything;
//! - `DEVTASKS_LOG` takes `EnvFilter` directives, e.g.
//!   `DEVTASKS_LOG=devtasks::watch=trace` to see every filtered change event
//!   or `DEVTASKS_LOG=info,devtasks::exec=debug`.
//!
//! A bare level in `DEVTASKS_LOG` is only the base level when the flag is
//! absent. Without either the base level is `warn`.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding extra filter directives.
pub const LOG_ENV: &str = "DEVTASKS_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::builder().parse_lossy(filter_directives(cli_level, env.as_deref()));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;

    Ok(())
}

/// Directive string for the given flag and `DEVTASKS_LOG` value.
///
/// The base level comes first, followed by every target-specific directive
/// from the environment in its original order.
pub fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    let mut env_level = None;
    let mut targeted = Vec::new();

    for directive in env.unwrap_or_default().split(',').map(str::trim) {
        if directive.is_empty() {
            continue;
        }
        if directive.parse::<LevelFilter>().is_ok() {
            env_level = Some(directive.to_ascii_lowercase());
        } else {
            targeted.push(directive);
        }
    }

    let base = match cli_level {
        Some(level) => level_directive(level).to_string(),
        None => env_level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
    };

    std::iter::once(base.as_str())
        .chain(targeted)
        .collect::<Vec<_>>()
        .join(",")
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
