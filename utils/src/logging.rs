//! Structured logging initialization via `tracing`.
//!
//! Two output formats are supported:
//! - [`LogFormat::Human`]: readable lines for development.
//! - [`LogFormat::Json`]: newline-delimited JSON for log aggregation.
//!
//! `RUST_LOG` overrides the caller-supplied level when set.

use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected 'human' or 'json')")),
        }
    }
}

/// Install the global subscriber in `format`, filtering at `level` unless
/// `RUST_LOG` is set. Returns `false` if a subscriber was already installed.
pub fn init_logging(format: LogFormat, level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .is_ok(),
    }
}

/// Install a subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
