//! Logging bootstrap for hosts embedding the validators
//!
//! Library code logs through the `log` facade and `tracing` spans; this
//! installs a `tracing-subscriber` formatter that receives both.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed, which leaves the
/// existing one in place.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Install a subscriber writing through the test harness' captured output
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
