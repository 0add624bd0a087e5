//! Diagnostic logging setup
//!
//! Human-facing output goes to stdout; tracing events go to stderr so they
//! never mix with exported text or CSV piped from stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "WARIKAN_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Build the filter: `WARIKAN_LOG`, then the configured fallback, then "warn"
pub fn build_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(configured: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(configured))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
