//! Domain error types
//!
//! This module defines the error hierarchy for CareVault. All errors are
//! domain-specific and don't expose third-party types: driver, cipher and
//! parser failures are converted to strings at the adapter boundary.

use crate::domain::role::Role;
use thiserror::Error;

/// Main CareVault error type
///
/// Every operation reachable from a user action returns this type. The CLI
/// converts it into a message and an exit code via [`CarevaultError::exit_code`].
#[derive(Debug, Error)]
pub enum CarevaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backing store unreachable (pool exhausted, connection refused)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Database-related errors other than connectivity
    #[error("Database error: {0}")]
    Database(String),

    /// Constraint violations such as a duplicate username
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Ciphertext could not be decoded or failed authentication
    #[error("Decode error: {0}")]
    Decode(String),

    /// Missing or malformed input on a write, rejected before any store call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The session's role may not perform the requested operation
    #[error("Operation '{operation}' is not permitted for role '{role}'")]
    Authorization { role: Role, operation: String },

    /// The session has not given data-processing consent yet
    #[error("Data-processing consent is required before accessing patient data")]
    ConsentRequired,

    /// Export file errors
    #[error("Export error: {0}")]
    Export(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl CarevaultError {
    /// Process exit code used by the CLI for this error
    ///
    /// - 2: configuration or validation problem
    /// - 3: authentication, authorization or consent refusal
    /// - 4: store unreachable
    /// - 5: everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CarevaultError::Configuration(_) | CarevaultError::Validation(_) => 2,
            CarevaultError::Authorization { .. } | CarevaultError::ConsentRequired => 3,
            CarevaultError::Connection(_) => 4,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CarevaultError {
    fn from(err: std::io::Error) -> Self {
        CarevaultError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CarevaultError {
    fn from(err: serde_json::Error) -> Self {
        CarevaultError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CarevaultError {
    fn from(err: toml::de::Error) -> Self {
        CarevaultError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for CarevaultError {
    fn from(err: csv::Error) -> Self {
        CarevaultError::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CarevaultError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_authorization_display() {
        let err = CarevaultError::Authorization {
            role: Role::Doctor,
            operation: "purge expired records".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Operation 'purge expired records' is not permitted for role 'doctor'"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CarevaultError::Validation("x".into()).exit_code(), 2);
        assert_eq!(CarevaultError::ConsentRequired.exit_code(), 3);
        assert_eq!(CarevaultError::Connection("x".into()).exit_code(), 4);
        assert_eq!(CarevaultError::Decode("x".into()).exit_code(), 5);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CarevaultError = io_err.into();
        assert!(matches!(err, CarevaultError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CarevaultError = toml_err.into();
        assert!(matches!(err, CarevaultError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = CarevaultError::Decode("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
