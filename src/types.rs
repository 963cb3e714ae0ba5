use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Kind of filesystem change reported by a change source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Moved => "moved",
        };
        f.write_str(s)
    }
}

/// A single filesystem change, consumed once by the watcher and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub is_directory: bool,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind, is_directory: bool) -> Self {
        Self {
            path: path.into(),
            kind,
            is_directory,
        }
    }

    /// Event for a regular file.
    pub fn file(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self::new(path, kind, false)
    }

    /// Event for a directory.
    pub fn dir(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self::new(path, kind, true)
    }
}

/// Outcome of an external command.
///
/// A command that cannot be spawned or dies from a signal is reported as
/// `Failed(-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failed(i32),
}

impl CommandOutcome {
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            CommandOutcome::Success
        } else {
            CommandOutcome::Failed(code)
        }
    }

    pub fn code(self) -> i32 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::Failed(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

/// Environment variable overrides merged over the inherited environment.
pub type EnvOverrides = BTreeMap<String, String>;
