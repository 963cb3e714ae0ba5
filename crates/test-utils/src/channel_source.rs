use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use devtasks::types::ChangeEvent;
use devtasks::watch::{ChangeSink, ChangeSource};

#[derive(Debug, Default)]
struct Inner {
    sink: Option<ChangeSink>,
    root: Option<PathBuf>,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
    fail_subscribe: bool,
}

/// A `ChangeSource` driven by the test instead of the filesystem.
///
/// Clones share state: hand one clone to the watcher and keep another to
/// emit events and inspect the subscription.
#[derive(Debug, Clone, Default)]
pub struct ChannelSource {
    inner: Arc<Mutex<Inner>>,
}

impl ChannelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose `subscribe` always fails.
    pub fn failing() -> Self {
        let source = Self::default();
        source.inner.lock().unwrap().fail_subscribe = true;
        source
    }

    /// Deliver an event. Returns false if nobody is subscribed.
    pub fn emit(&self, event: ChangeEvent) -> bool {
        match &self.inner.lock().unwrap().sink {
            Some(sink) => sink.send(event).is_ok(),
            None => false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.lock().unwrap().sink.is_some()
    }

    pub fn subscribed_root(&self) -> Option<PathBuf> {
        self.inner.lock().unwrap().root.clone()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.inner.lock().unwrap().subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.inner.lock().unwrap().unsubscribe_calls
    }

    /// Simulate the delivery worker dying on its own.
    pub fn close(&self) {
        self.inner.lock().unwrap().sink = None;
    }
}

impl ChangeSource for ChannelSource {
    fn subscribe(&mut self, root: &Path, sink: ChangeSink) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribe_calls += 1;
        if inner.fail_subscribe {
            anyhow::bail!("cannot watch {:?}", root);
        }
        inner.root = Some(root.to_path_buf());
        inner.sink = Some(sink);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.unsubscribe_calls += 1;
        inner.sink = None;
    }
}
