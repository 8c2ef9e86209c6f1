//! Tracing setup for the myflix binary
//!
//! Logs go to stderr so they never mix with rendered output. The filter is
//! taken from `MYFLIX_LOG` (EnvFilter syntax), then `MYFLIX_LOG_LEVEL`
//! (trace, debug, info, warn, error), then defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a full filter directive
pub const LOG_FILTER_ENV_VAR: &str = "MYFLIX_LOG";

/// Environment variable holding a plain level name
pub const LOG_LEVEL_ENV_VAR: &str = "MYFLIX_LOG_LEVEL";

/// Map a level name to a filter directive, defaulting to warn
pub fn level_directive(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "warn", // Default to WARN to reduce noise
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV_VAR) {
        return filter;
    }
    #[allow(clippy::disallowed_methods)]
    let level = std::env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| "warn".to_string());
    EnvFilter::new(level_directive(&level))
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_ok() {
        tracing::debug!("Tracing initialized successfully");
    }
}
