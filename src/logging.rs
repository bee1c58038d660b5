//! Diagnostic logging setup
//!
//! Logs go to stderr so that stdout stays clean for text, JSON and diff output.
//! `POMUP_LOG` (or `RUST_LOG`) overrides the level derived from the flags.

use crate::output::Verbosity;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "POMUP_LOG";

/// Default filter directive for a verbosity
pub fn directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
    }
}

/// Build the filter from the environment, falling back to the verbosity level
pub fn filter(verbosity: Verbosity) -> EnvFilter {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(directive(verbosity)))
}

/// Install the global subscriber; later calls keep the first one
pub fn init(verbosity: Verbosity) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        debug!("Subscriber already installed: {}", e);
    }
}
