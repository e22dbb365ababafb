//! Logging setup for `pack_tool`.
//!
//! Diagnostics go to stderr through `tracing-subscriber`; stdout carries
//! only the one-line result of a run.

use tracing_subscriber::EnvFilter;

/// Env var holding the log filter (takes precedence over `RUST_LOG`).
pub const LOG_ENV: &str = "PACK_TOOL_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `PACK_TOOL_LOG`, then `RUST_LOG`, then `warn`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
