//! Tracing setup

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// Install the global fmt subscriber, filtered by `RUST_LOG`
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
