use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory console shared between the code under test and the test.
///
/// Hand one clone to `TestWatcher::with_console` (or a `RecordingRunner`
/// transcript) and read everything written so far with [`text`](Self::text).
#[derive(Debug, Clone, Default)]
pub struct SharedConsole {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Write for SharedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
