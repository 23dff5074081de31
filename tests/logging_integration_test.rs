//! Integration tests for logging functionality

use curator::config::{load_config_from_str, LoggingConfig};
use curator::core::reconcile::ReconcileCounts;
use curator::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_logging_rotations() {
    for rotation in ["daily", "hourly", "never"] {
        let toml = format!("[logging]\nlocal_rotation = \"{rotation}\"\n");
        let config = load_config_from_str(&toml).unwrap();
        assert_eq!(config.logging.local_rotation, rotation);
    }

    assert!(load_config_from_str("[logging]\nlocal_rotation = \"weekly\"\n").is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let config = LoggingConfig {
        local_enabled: false,
        local_path: String::new(),
        local_rotation: "daily".to_string(),
    };

    assert!(init_logging("verbose", &config).is_err());
}

#[test]
fn test_logging_directory_creation() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.exists());
    assert!(guard.writes_file());

    tracing::info!("written to the log directory");
    drop(guard);
}

#[test]
fn test_logging_macros() {
    let counts = ReconcileCounts {
        created: 3,
        updated: 1,
        skipped: 6,
        errors: 0,
    };

    curator::log_group_start!(1, 2, 10);
    curator::log_group_complete!(1, 2, &counts);
    curator::log_record_error!("Unknown Hall", "Some Exhibition", "unknown venue");
    curator::log_retry_attempt!(2, 5, "serialization failure");
}
