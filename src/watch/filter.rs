// src/watch/filter.rs

//! Per-event filtering for the test watcher.
//!
//! Rules, first match wins:
//! 1. path contains an ignored fragment -> skip
//! 2. directory event -> skip
//! 3. path ends with `~` (editor backup file) -> skip
//! 4. otherwise dispatch a test run

use std::borrow::Cow;

use crate::types::ChangeEvent;

/// Fixed set of path fragments matched by plain substring containment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    fragments: Vec<String>,
}

impl IgnoreList {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    /// First fragment contained in `path`, if any.
    pub fn matching_fragment(&self, path: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|frag| path.contains(frag.as_str()))
            .map(String::as_str)
    }
}

/// Why an event was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    IgnoredPath(String),
    Directory,
    BackupFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Dispatch,
    Skip(SkipReason),
}

/// Decide whether `event` should trigger a test run.
pub fn classify(event: &ChangeEvent, ignore: &IgnoreList) -> Decision {
    let path = path_text(event);

    if let Some(fragment) = ignore.matching_fragment(&path) {
        return Decision::Skip(SkipReason::IgnoredPath(fragment.to_string()));
    }

    if event.is_directory {
        return Decision::Skip(SkipReason::Directory);
    }

    if path.ends_with('~') {
        return Decision::Skip(SkipReason::BackupFile);
    }

    Decision::Dispatch
}

pub(crate) fn path_text(event: &ChangeEvent) -> Cow<'_, str> {
    event.path.to_string_lossy()
}
