// src/errors.rs

//! Crate-wide error type, result alias and exit-code mapping.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevtasksError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to find version in {}", .0.display())]
    VersionNotFound(PathBuf),

    #[error("Can't determine previous library version from {}", .0.display())]
    PreviousVersionNotFound(PathBuf),

    #[error("Errors: {}", .0.join(", "))]
    StagesFailed(Vec<String>),

    #[error("Command `{cmd}` failed with exit code {code}")]
    CommandFailed { cmd: String, code: i32 },

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevtasksError {
    /// Process exit code for this failure.
    ///
    /// The aggregate check task exits with the number of failed stages, a
    /// failed single command passes its own code through, an interrupt
    /// exits like a shell does after SIGINT (130), everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DevtasksError::StagesFailed(stages) => {
                i32::try_from(stages.len()).unwrap_or(i32::MAX)
            }
            DevtasksError::CommandFailed { code, .. } if *code > 0 => *code,
            DevtasksError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevtasksError>;
