// src/watch/watcher.rs

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::config::ConfigFile;
use crate::exec::CommandRunner;
use crate::types::{ChangeEvent, CommandOutcome, EnvOverrides};
use crate::watch::filter::{classify, path_text, Decision, IgnoreList};
use crate::watch::source::ChangeSource;

/// How long to wait, after unsubscribing, for the change source to drop
/// its end of the event channel.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Immutable inputs of the test watcher.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub test_cmd: String,
    pub env: EnvOverrides,
    pub ignore: IgnoreList,
}

impl WatchSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            test_cmd: cfg.checks().unit_tests.clone(),
            env: cfg.env().clone(),
            ignore: IgnoreList::new(cfg.watch().ignore.iter().cloned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Watching,
    Stopped,
}

/// What happened during one [`TestWatcher::watch`] session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// The session ended because shutdown was requested, not because the
    /// source stopped on its own.
    pub interrupted: bool,
    /// Test runs triggered by change events (the initial run is not counted).
    pub triggered_runs: usize,
    /// Events dropped by the filter.
    pub skipped_events: usize,
    /// Triggered runs that failed.
    pub failed_runs: usize,
}

/// Re-runs the test command whenever a qualifying file changes.
///
/// Events are consumed one at a time from a single channel, so a burst of
/// changes queues up and produces one full run per event. Nothing is
/// coalesced and runs never overlap.
pub struct TestWatcher<'r> {
    runner: &'r dyn CommandRunner,
    settings: WatchSettings,
    state: WatcherState,
    console: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for TestWatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestWatcher")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'r> TestWatcher<'r> {
    pub fn new(runner: &'r dyn CommandRunner, settings: WatchSettings) -> Self {
        Self {
            runner,
            settings,
            state: WatcherState::Idle,
            console: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Send progress lines to `out` instead of stdout.
    pub fn with_console(mut self, out: impl Write + Send + 'static) -> Self {
        self.console = Mutex::new(Box::new(out));
        self
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Run the test command once with the configured environment.
    pub async fn run_tests(&self) -> CommandOutcome {
        let outcome = self
            .runner
            .run(&self.settings.test_cmd, Some(&self.settings.env))
            .await;
        if !outcome.is_success() {
            self.say(format_args!("Tests failed. Check output for details."));
        }
        outcome
    }

    /// Handle one change event.
    ///
    /// Returns the outcome of the test run, or `None` if the event was
    /// filtered out (in which case nothing is printed or executed).
    pub async fn dispatch(&self, event: &ChangeEvent) -> Option<CommandOutcome> {
        match classify(event, &self.settings.ignore) {
            Decision::Skip(reason) => {
                trace!(path = ?event.path, ?reason, "skipping change event");
                None
            }
            Decision::Dispatch => {
                self.say(format_args!("{} {}", path_text(event), event.kind));
                Some(self.run_tests().await)
            }
        }
    }

    /// Watch `root` through `source` until `shutdown` resolves.
    ///
    /// Subscribes, runs the tests once unconditionally, then dispatches
    /// events in arrival order. On every exit path the source is
    /// unsubscribed; on the normal path we additionally wait (up to
    /// [`SHUTDOWN_GRACE`]) for its delivery worker to let go of the channel.
    pub async fn watch<S, F>(
        &mut self,
        source: &mut S,
        root: &Path,
        shutdown: F,
    ) -> Result<WatchSummary>
    where
        S: ChangeSource + ?Sized,
        F: Future<Output = ()>,
    {
        if self.state != WatcherState::Idle {
            return Err(anyhow!(
                "test watcher cannot be started from state {:?}",
                self.state
            ));
        }

        let (sink, mut events) = mpsc::unbounded_channel::<ChangeEvent>();
        source.subscribe(root, sink)?;
        let subscription = Subscription { source };
        self.state = WatcherState::Watching;

        self.say(format_args!("Running tests"));
        self.run_tests().await;

        self.say(format_args!("Watching {} for changes.", root.display()));

        let mut summary = WatchSummary::default();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("shutdown requested; stopping test watcher");
                    summary.interrupted = true;
                    break;
                }

                event = events.recv() => {
                    let Some(event) = event else {
                        warn!("change source stopped delivering events");
                        break;
                    };
                    match self.dispatch(&event).await {
                        Some(outcome) => {
                            summary.triggered_runs += 1;
                            if !outcome.is_success() {
                                summary.failed_runs += 1;
                            }
                        }
                        None => summary.skipped_events += 1,
                    }
                }
            }
        }

        drop(subscription);
        wait_for_source_shutdown(&mut events).await;
        self.state = WatcherState::Stopped;

        info!(?summary, "test watcher stopped");
        Ok(summary)
    }

    fn say(&self, line: std::fmt::Arguments<'_>) {
        let mut out = self.console.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %err, "could not write watcher output");
        }
    }
}

/// Unsubscribes its source when dropped, including on early returns and
/// when the owning future is cancelled.
struct Subscription<'s, S: ChangeSource + ?Sized> {
    source: &'s mut S,
}

impl<S: ChangeSource + ?Sized> Drop for Subscription<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe();
    }
}

async fn wait_for_source_shutdown(events: &mut mpsc::UnboundedReceiver<ChangeEvent>) {
    let drain = async {
        let mut discarded = 0usize;
        while events.recv().await.is_some() {
            discarded += 1;
        }
        discarded
    };

    match tokio::time::timeout(SHUTDOWN_GRACE, drain).await {
        Ok(discarded) => debug!(discarded, "change source released its sink"),
        Err(_) => warn!(
            grace = ?SHUTDOWN_GRACE,
            "change source did not stop in time; continuing shutdown"
        ),
    }
}
