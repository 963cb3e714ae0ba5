// src/tasks/release.rs

//! `release`: tag the current commit with the manifest version and push it.

use tracing::info;

use crate::errors::{DevtasksError, Result};
use crate::manifest::read_version;
use crate::types::CommandOutcome;

use super::TaskContext;

/// Returns the released version.
///
/// Nothing is executed if the manifest has no version. If tagging fails the
/// push is not attempted.
pub async fn release(ctx: &TaskContext<'_>) -> Result<String> {
    let manifest = ctx.manifest_path();
    let version = read_version(ctx.fs, &manifest)?;
    ensure_tag_name(&version)?;

    println!("Releasing {version}");

    let remote = &ctx.config.release().remote;
    let steps = [
        format!("git tag {version}"),
        format!("git push {remote} {version}"),
    ];

    for cmd in steps {
        let outcome = ctx.runner.run(&cmd, None).await;
        if let CommandOutcome::Failed(code) = outcome {
            return Err(DevtasksError::CommandFailed { cmd, code });
        }
    }

    info!(%version, %remote, "release tag pushed");
    Ok(version)
}

// The version is interpolated into shell commands.
fn ensure_tag_name(version: &str) -> Result<()> {
    let valid = !version.is_empty()
        && !version.starts_with('-')
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+'));

    if valid {
        Ok(())
    } else {
        Err(DevtasksError::ConfigError(format!(
            "manifest version {version:?} is not usable as a git tag"
        )))
    }
}
