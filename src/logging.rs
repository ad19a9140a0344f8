//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `NAVLAUNCH_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`

use crate::cli::LogLevel;
use tracing_subscriber::EnvFilter;

/// Initialise the global logging subscriber. Call once at startup.
pub fn init(cli_level: Option<LogLevel>) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_env("NAVLAUNCH_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
