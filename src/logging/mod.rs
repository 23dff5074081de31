//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted log files
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use curator::logging::init_logging;
//! use curator::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a reconciliation group
///
/// # Example
///
/// ```no_run
/// use curator::log_group_start;
///
/// log_group_start!(1, 3, 100);
/// ```
#[macro_export]
macro_rules! log_group_start {
    ($group:expr, $total_groups:expr, $size:expr) => {
        tracing::debug!(
            group = $group,
            total_groups = $total_groups,
            size = $size,
            "Reconciling group"
        );
    };
}

/// Log the counts of a finished reconciliation group
///
/// # Example
///
/// ```no_run
/// use curator::log_group_complete;
/// use curator::core::reconcile::ReconcileCounts;
///
/// let counts = ReconcileCounts::default();
/// log_group_complete!(1, 3, &counts);
/// ```
#[macro_export]
macro_rules! log_group_complete {
    ($group:expr, $total_groups:expr, $counts:expr) => {
        tracing::info!(
            group = $group,
            total_groups = $total_groups,
            created = $counts.created,
            updated = $counts.updated,
            skipped = $counts.skipped,
            errors = $counts.errors,
            "Group reconciled"
        );
    };
}

/// Log a record that could not be reconciled
///
/// # Example
///
/// ```no_run
/// use curator::log_record_error;
///
/// log_record_error!("Unknown Hall", "Some Exhibition", "unknown venue");
/// ```
#[macro_export]
macro_rules! log_record_error {
    ($venue:expr, $title:expr, $reason:expr) => {
        tracing::warn!(
            venue = %$venue,
            title = %$title,
            reason = %$reason,
            "Record not reconciled"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use curator::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
