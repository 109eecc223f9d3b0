//! Tracing subscriber setup.
//!
//! Invariants:
//! - Logs go to stderr; stdout carries only the run summary and `--print-creds` output.
//! - `RUST_LOG`, when set, overrides the `--log`/`SSO_LOG_LEVEL` level.

use gauth_config::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. A second call is a no-op.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
