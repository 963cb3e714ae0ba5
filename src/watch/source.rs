// src/watch/source.rs

//! Change sources: where filesystem events come from.
//!
//! A [`ChangeSource`] delivers [`ChangeEvent`]s for everything under a root
//! directory into a sink channel, from whatever thread it likes, until it is
//! unsubscribed. Once a source has fully stopped it must have dropped the
//! sink, which is how the watcher observes that delivery is over.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{ChangeEvent, ChangeKind};

pub type ChangeSink = mpsc::UnboundedSender<ChangeEvent>;

/// How long the first half of a rename waits for its partner before it is
/// reported as a deletion.
pub const RENAME_PAIR_WINDOW: Duration = Duration::from_millis(100);

/// Trackers of renames already reported from their `From`/`To` halves,
/// kept so the combined event some backends send afterwards is not
/// reported twice.
const RECENT_PAIRS: usize = 64;

/// Something that can observe a directory tree and report changes.
pub trait ChangeSource: Send {
    /// Start delivering events for `root` (recursively) into `sink`.
    fn subscribe(&mut self, root: &Path, sink: ChangeSink) -> Result<()>;

    /// Stop delivering events and release the sink. Must be idempotent.
    fn unsubscribe(&mut self);
}

/// Change source backed by the platform's native notification API.
///
/// Raw `notify` events are handed to a delivery thread that translates them
/// and feeds the sink. Dropping the `RecommendedWatcher` disconnects that
/// thread, which then exits and drops the sink.
pub struct NotifySource {
    fs: Arc<dyn FileSystem>,
    watcher: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for NotifySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifySource")
            .field("subscribed", &self.watcher.is_some())
            .finish()
    }
}

impl NotifySource {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, watcher: None }
    }
}

impl Default for NotifySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeSource for NotifySource {
    fn subscribe(&mut self, root: &Path, sink: ChangeSink) -> Result<()> {
        let (raw_tx, raw_rx) = std_mpsc::channel::<notify::Result<Event>>();

        let mut watcher = RecommendedWatcher::new(raw_tx, Config::default())
            .context("creating filesystem watcher")?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("watching {:?}", root))?;

        let mut translator = EventTranslator::new(Arc::clone(&self.fs));
        translator.remember_dir(root);

        thread::Builder::new()
            .name("devtasks-notify".to_string())
            .spawn(move || deliver(raw_rx, translator, sink))
            .context("spawning change delivery thread")?;

        info!("file watcher started on {:?}", root);
        self.watcher = Some(watcher);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.watcher.take().is_some() {
            info!("file watcher stopped");
        }
    }
}

/// Body of the delivery thread. Returns once the watcher is gone or the
/// sink has been closed.
fn deliver(
    raw: std_mpsc::Receiver<notify::Result<Event>>,
    mut translator: EventTranslator,
    sink: ChangeSink,
) {
    loop {
        let received = match translator.next_deadline() {
            Some(deadline) => {
                raw.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => raw.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let changes = match received {
            Ok(Ok(event)) => {
                trace!(?event, "received notify event");
                translator.translate(&event, Instant::now())
            }
            Ok(Err(err)) => {
                warn!(error = %err, "file watch error");
                continue;
            }
            Err(RecvTimeoutError::Timeout) => translator.flush_expired(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                debug!("notify watcher dropped; delivery thread exiting");
                return;
            }
        };

        for change in changes {
            if sink.send(change).is_err() {
                debug!("change sink closed; delivery thread exiting");
                return;
            }
        }
    }
}

#[derive(Debug)]
struct PendingRename {
    tracker: Option<usize>,
    from: PathBuf,
    is_dir: bool,
    deadline: Instant,
}

/// Turns `notify` events into [`ChangeEvent`]s.
///
/// - create -> `Created`, remove -> `Deleted`, data/metadata -> `Modified`
/// - a rename seen from both ends -> one `Moved` for the source path
/// - a `To` half without a `From` (moved in from outside) -> `Created`
/// - a `From` half whose partner never arrives within
///   [`RENAME_PAIR_WINDOW`] (moved out) -> `Deleted`
/// - access and unclassified events are dropped
///
/// Paths that no longer exist can't be asked whether they were
/// directories, so every directory seen along the way is remembered.
pub struct EventTranslator {
    fs: Arc<dyn FileSystem>,
    known_dirs: HashSet<PathBuf>,
    pending: VecDeque<PendingRename>,
    recent_pairs: VecDeque<usize>,
}

impl std::fmt::Debug for EventTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTranslator")
            .field("known_dirs", &self.known_dirs.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl EventTranslator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            known_dirs: HashSet::new(),
            pending: VecDeque::new(),
            recent_pairs: VecDeque::new(),
        }
    }

    pub fn remember_dir(&mut self, path: &Path) {
        self.known_dirs.insert(path.to_path_buf());
    }

    /// Earliest moment an unpaired rename half has to be flushed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Report every rename half whose partner did not show up in time.
    pub fn flush_expired(&mut self, now: Instant) -> Vec<ChangeEvent> {
        let mut out = Vec::new();
        while let Some(pos) = self.pending.iter().position(|p| p.deadline <= now) {
            if let Some(p) = self.pending.remove(pos) {
                debug!(path = ?p.from, "rename source has no partner; reporting deletion");
                self.forget_dir(&p.from);
                out.push(ChangeEvent::new(p.from, ChangeKind::Deleted, p.is_dir));
            }
        }
        out
    }

    pub fn translate(&mut self, event: &Event, now: Instant) -> Vec<ChangeEvent> {
        let mut out = self.flush_expired(now);

        let (kind, dir_hint) = match event.kind {
            EventKind::Create(CreateKind::Folder) => (ChangeKind::Created, Some(true)),
            EventKind::Create(CreateKind::File) => (ChangeKind::Created, Some(false)),
            EventKind::Create(_) => (ChangeKind::Created, None),
            EventKind::Remove(RemoveKind::Folder) => (ChangeKind::Deleted, Some(true)),
            EventKind::Remove(RemoveKind::File) => (ChangeKind::Deleted, Some(false)),
            EventKind::Remove(_) => (ChangeKind::Deleted, None),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                out.extend(self.rename_both(event));
                return out;
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                self.rename_from(event, now);
                return out;
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                out.extend(self.rename_to(event));
                return out;
            }
            EventKind::Modify(ModifyKind::Name(_)) => (ChangeKind::Moved, None),
            EventKind::Modify(_) => (ChangeKind::Modified, None),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => return out,
        };

        for path in &event.paths {
            let is_dir = dir_hint.unwrap_or_else(|| self.is_dir(path));
            self.observe(path, is_dir, kind);
            out.push(ChangeEvent::new(path.clone(), kind, is_dir));
        }
        out
    }

    fn rename_from(&mut self, event: &Event, now: Instant) {
        for from in &event.paths {
            let is_dir = self.is_dir(from);
            self.pending.push_back(PendingRename {
                tracker: event.attrs.tracker(),
                from: from.clone(),
                is_dir,
                deadline: now + RENAME_PAIR_WINDOW,
            });
        }
    }

    fn rename_to(&mut self, event: &Event) -> Vec<ChangeEvent> {
        let tracker = event.attrs.tracker();
        let mut out = Vec::new();

        for to in &event.paths {
            let is_dir = self.is_dir(to);
            match self.take_pending(tracker) {
                Some(pending) => {
                    if let Some(t) = tracker {
                        self.remember_pair(t);
                    }
                    self.forget_dir(&pending.from);
                    self.observe(to, is_dir, ChangeKind::Created);
                    out.push(ChangeEvent::new(pending.from, ChangeKind::Moved, is_dir));
                }
                None => {
                    self.observe(to, is_dir, ChangeKind::Created);
                    out.push(ChangeEvent::new(to.clone(), ChangeKind::Created, is_dir));
                }
            }
        }
        out
    }

    fn rename_both(&mut self, event: &Event) -> Vec<ChangeEvent> {
        if let Some(t) = event.attrs.tracker() {
            if let Some(pos) = self.recent_pairs.iter().position(|&seen| seen == t) {
                self.recent_pairs.remove(pos);
                return Vec::new();
            }
            // The halves may still be pending if they raced the combined event.
            while self.take_pending(Some(t)).is_some() {}
        }

        let Some(src) = event.paths.first() else {
            return Vec::new();
        };
        let is_dir = match event.paths.get(1) {
            Some(dst) => self.is_dir(dst),
            None => self.is_dir(src),
        };
        self.forget_dir(src);
        if let Some(dst) = event.paths.get(1) {
            self.observe(dst, is_dir, ChangeKind::Created);
        }
        vec![ChangeEvent::new(src.clone(), ChangeKind::Moved, is_dir)]
    }

    fn take_pending(&mut self, tracker: Option<usize>) -> Option<PendingRename> {
        let pos = self.pending.iter().position(|p| p.tracker == tracker)?;
        self.pending.remove(pos)
    }

    fn remember_pair(&mut self, tracker: usize) {
        if self.recent_pairs.len() == RECENT_PAIRS {
            self.recent_pairs.pop_front();
        }
        self.recent_pairs.push_back(tracker);
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.fs.is_dir(path) || self.known_dirs.contains(path)
    }

    fn observe(&mut self, path: &Path, is_dir: bool, kind: ChangeKind) {
        if let Some(parent) = path.parent() {
            self.known_dirs.insert(parent.to_path_buf());
        }
        match (is_dir, kind) {
            (_, ChangeKind::Deleted) => self.forget_dir(path),
            (_, ChangeKind::Moved) if !self.fs.is_dir(path) => self.forget_dir(path),
            (true, _) => {
                self.known_dirs.insert(path.to_path_buf());
            }
            (false, _) => {}
        }
    }

    fn forget_dir(&mut self, path: &Path) {
        self.known_dirs.retain(|dir| !dir.starts_with(path));
    }
}
