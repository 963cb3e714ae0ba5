// src/tasks/unasync.rs

use crate::errors::{DevtasksError, Result};
use crate::types::CommandOutcome;

use super::TaskContext;

/// The `unasync` task: regenerate the synchronous sources, then reformat.
pub async fn unasync(ctx: &TaskContext<'_>) -> Result<()> {
    let section = ctx.config.unasync();

    for cmd in [&section.generate, &section.format] {
        if let CommandOutcome::Failed(code) = ctx.runner.run(cmd, None).await {
            return Err(DevtasksError::CommandFailed {
                cmd: cmd.clone(),
                code,
            });
        }
    }

    Ok(())
}
