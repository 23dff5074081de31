//! Subscriber setup
//!
//! Console output goes to stderr so the reconcile summary on stdout stays
//! readable. When local logging is enabled, the same events are also written
//! as JSON lines to `<local_path>/curator.log`, rotated per
//! `logging.local_rotation`.

use crate::config::LoggingConfig;
use crate::domain::{CuratorError, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "curator.log";

/// Keeps the non-blocking file writer alive; dropping it flushes pending lines
pub struct LoggingGuard {
    file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether events are also going to a log file
    pub fn writes_file(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Install the global subscriber
///
/// `RUST_LOG`, when set, replaces the `curator=<level>` filter built from
/// `log_level`.
///
/// # Errors
///
/// Returns `CuratorError::Configuration` for an unknown level or rotation, or
/// when the log directory cannot be created. Nothing is installed in that case.
pub fn init_logging(log_level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("curator={level}")))
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter())
        .boxed();

    let (file_layer, file_guard) = if config.local_enabled {
        let rotation = parse_rotation(&config.local_rotation)?;
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            CuratorError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                config.local_path
            ))
        })?;

        let appender = RollingFileAppender::new(rotation, &config.local_path, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(writer)
            .with_filter(filter())
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!(
        level = %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        rotation = %config.local_rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard { file_guard })
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Level::from_str(level)
            .map_err(|e| CuratorError::Configuration(format!("Invalid log level {level}: {e}"))),
        _ => Err(CuratorError::Configuration(format!(
            "Invalid log level: {level}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}

fn parse_rotation(rotation: &str) -> Result<Rotation> {
    match rotation {
        "daily" => Ok(Rotation::DAILY),
        "hourly" => Ok(Rotation::HOURLY),
        "never" => Ok(Rotation::NEVER),
        other => Err(CuratorError::Configuration(format!(
            "Invalid log rotation '{other}'. Must be one of: daily, hourly, never"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("Debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert!(parse_log_level("verbose").is_err());
        assert!(parse_log_level("3").is_err());
        assert!(parse_log_level("").is_err());
    }

    #[test]
    fn test_parse_rotation() {
        assert!(parse_rotation("daily").is_ok());
        assert!(parse_rotation("hourly").is_ok());
        assert!(parse_rotation("never").is_ok());
        assert!(parse_rotation("weekly").is_err());
    }

    #[test]
    fn test_unknown_rotation_installs_nothing() {
        let config = LoggingConfig {
            local_enabled: true,
            local_path: std::env::temp_dir().to_string_lossy().to_string(),
            local_rotation: "monthly".to_string(),
        };
        assert!(init_logging("info", &config).is_err());
    }
}
