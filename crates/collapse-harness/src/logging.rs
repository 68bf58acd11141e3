#![forbid(unsafe_code)]

//! Test logging setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a `tracing` fmt subscriber writing to the test output.
///
/// Filtering follows `RUST_LOG` and defaults to `warn`. Safe to call from
/// every test; only the first call installs anything.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
