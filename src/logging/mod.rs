//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - console output on stderr
//! - optional JSON file logging with rotation
//! - `RUST_LOG` style filtering
//!
//! Patient names, contacts, diagnoses and passwords are never passed to
//! these macros or to any `tracing` call; only identifiers, roles, action
//! labels and counts are logged.
//!
//! # Example
//!
//! ```no_run
//! use carevault::logging::init_logging;
//! use carevault::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a refused operation
///
/// # Example
///
/// ```no_run
/// use carevault::log_operation_denied;
/// use carevault::domain::Role;
///
/// log_operation_denied!(Role::Doctor, "purge expired records", "role");
/// ```
#[macro_export]
macro_rules! log_operation_denied {
    ($role:expr, $operation:expr, $reason:expr) => {
        tracing::warn!(
            role = %$role,
            operation = $operation,
            reason = $reason,
            "Operation denied"
        );
    };
}

/// Log a store fault that was absorbed rather than propagated
///
/// # Example
///
/// ```no_run
/// use carevault::log_store_fault;
/// use carevault::domain::CarevaultError;
///
/// let error = CarevaultError::Connection("pool timed out".to_string());
/// log_store_fault!(&error, "authenticate");
/// ```
#[macro_export]
macro_rules! log_store_fault {
    ($error:expr, $operation:expr) => {
        tracing::error!(
            error = %$error,
            operation = $operation,
            "Store fault"
        );
    };
}
