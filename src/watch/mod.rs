// src/watch/mod.rs

//! Change-triggered test watcher.
//!
//! This module is responsible for:
//! - Deciding which filesystem events matter ([`filter`]).
//! - Abstracting where events come from, with a `notify`-backed
//!   implementation for production ([`source`]).
//! - The watcher state machine that re-runs the test command ([`watcher`]).

pub mod filter;
pub mod source;
pub mod watcher;

pub use filter::{classify, Decision, IgnoreList, SkipReason};
pub use source::{ChangeSink, ChangeSource, EventTranslator, NotifySource, RENAME_PAIR_WINDOW};
pub use watcher::{TestWatcher, WatchSettings, WatchSummary, WatcherState, SHUTDOWN_GRACE};
