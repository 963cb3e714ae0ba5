pub mod builders;
pub mod channel_source;
pub mod console;
pub mod recording_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use devtasks::logging::{filter_directives, LOG_ENV};
use devtasks::watch::SHUTDOWN_GRACE;
use tracing_subscriber::{fmt, EnvFilter};

pub use channel_source::ChannelSource;
pub use console::SharedConsole;
pub use recording_runner::{RecordedCall, RecordingRunner};

static INIT: Once = Once::new();

/// Upper bound for a whole async test. A watch session may spend up to
/// [`SHUTDOWN_GRACE`] draining its source, so leave room on top of that.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(SHUTDOWN_GRACE.as_secs() + 5);

/// Capture `devtasks` logs in tests, honouring `DEVTASKS_LOG` the same way
/// the binary does (`DEVTASKS_LOG=devtasks::watch=trace cargo test`).
///
/// Output goes through the test writer, so it only shows for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV).ok();
        let filter = EnvFilter::builder().parse_lossy(filter_directives(None, env.as_deref()));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
