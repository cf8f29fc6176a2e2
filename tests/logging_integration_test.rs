//! Integration tests for logging functionality

use carevault::config::LoggingConfig;
use carevault::domain::{CarevaultError, Role};
use carevault::logging::init_logging;
use carevault::{log_operation_denied, log_store_fault};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

// Only one subscriber can be installed per process, so initialization is
// exercised in a single test.
#[test]
fn test_init_creates_directory_once() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");
    assert!(!log_path.exists());

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    assert!(init_logging("verbose", &config).is_err());

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    log_operation_denied!(Role::Receptionist, "system backup", "role");
    log_store_fault!(
        CarevaultError::Connection("pool timed out".to_string()),
        "authenticate"
    );

    let err = init_logging("info", &config).err().unwrap();
    assert!(matches!(err, CarevaultError::Configuration(_)));
    drop(guard);
}
