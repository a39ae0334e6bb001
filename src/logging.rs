//! `tracing` subscriber setup shared by both binaries.
//!
//! Logs go to stderr: the fetcher's stdout carries its JSON output.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable switching to JSON log lines.
pub const JSON_LOG_ENV: &str = "WEATHER_LOG_JSON";

/// Initialise the `tracing` subscriber.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weather_relay=info,weather_fetch=info,weather_forward=info"));

    if std::env::var(JSON_LOG_ENV).is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
