//! Logging setup shared by the services

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
