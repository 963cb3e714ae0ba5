use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use devtasks::exec::{CommandRunner, RunFuture};
use devtasks::types::{CommandOutcome, EnvOverrides};

use crate::console::SharedConsole;

/// One command the runner was asked to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub cmd: String,
    pub env: Option<EnvOverrides>,
}

/// A fake runner that:
/// - records every command and its environment overrides
/// - answers with a scripted exit code per command (0 unless configured)
/// - optionally echoes `> cmd` into a console, like `ShellRunner` does.
///
/// Clones share their state, so a test can keep one handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    exit_codes: Arc<Mutex<HashMap<String, i32>>>,
    transcript: Option<SharedConsole>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `cmd` exit with `code` every time it is run.
    pub fn with_exit_code(self, cmd: &str, code: i32) -> Self {
        self.exit_codes.lock().unwrap().insert(cmd.to_string(), code);
        self
    }

    /// Echo every command into `console`, interleaved with whatever else
    /// writes there.
    pub fn with_transcript(mut self, console: SharedConsole) -> Self {
        self.transcript = Some(console);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.cmd).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Wait until at least `n` commands have been run.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(&'a self, cmd: &'a str, env: Option<&'a EnvOverrides>) -> RunFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(RecordedCall {
                cmd: cmd.to_string(),
                env: env.cloned(),
            });

            if let Some(mut console) = self.transcript.clone() {
                writeln!(console, "> {cmd}").unwrap();
            }

            let code = self
                .exit_codes
                .lock()
                .unwrap()
                .get(cmd)
                .copied()
                .unwrap_or(0);

            CommandOutcome::from_code(code)
        })
    }
}
