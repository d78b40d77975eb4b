//! `tracing` subscriber setup.

use crate::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when the configured level does not parse.
const FALLBACK_FILTER: &str = "warn";

/// Logging initialisation errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    File(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Parse a level or directive string, e.g. `info` or `approval_gate=debug`.
pub fn parse_filter(level: &str) -> Option<EnvFilter> {
    EnvFilter::try_new(level).ok()
}

/// Install the global subscriber described by `config`.
///
/// Logs go to `config.file` when set (appending, no ANSI colours),
/// otherwise to stderr. An unparsable level falls back to `warn`.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = parse_filter(&config.level).unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_filter() {
        assert!(parse_filter("info").is_some());
        assert!(parse_filter("approval_gate=debug").is_some());
        assert!(parse_filter("approval_gate=loud").is_none());
    }

    #[test]
    fn test_init_with_file_creates_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gate.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(path.clone()),
        };

        init(&config).unwrap();
        tracing::info!("logging initialised");

        assert!(path.exists());
        // A second global subscriber is refused.
        assert!(matches!(init(&config), Err(LoggingError::Init(_))));
    }
}
