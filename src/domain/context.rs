//! Error context extension trait
//!
//! Provides `.context()` and `.with_context()` on any result whose error
//! converts into [`CarevaultError`], in the spirit of `anyhow::Context` but
//! without leaving the domain error type.
//!
//! # Examples
//!
//! ```rust
//! use carevault::domain::Result;
//! use carevault::domain::context::ResultExt;
//!
//! fn read_template(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .context(format!("Failed to read template: {}", path))
//! }
//! ```

use crate::domain::errors::CarevaultError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (evaluated only on error)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CarevaultError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f().to_string()))
    }
}

/// Prefix the message while keeping the variant, so exit codes survive
fn wrap(err: CarevaultError, context: String) -> CarevaultError {
    match err {
        CarevaultError::Configuration(m) => {
            CarevaultError::Configuration(format!("{context}: {m}"))
        }
        CarevaultError::Connection(m) => CarevaultError::Connection(format!("{context}: {m}")),
        CarevaultError::Database(m) => CarevaultError::Database(format!("{context}: {m}")),
        CarevaultError::Integrity(m) => CarevaultError::Integrity(format!("{context}: {m}")),
        CarevaultError::Decode(m) => CarevaultError::Decode(format!("{context}: {m}")),
        CarevaultError::Validation(m) => CarevaultError::Validation(format!("{context}: {m}")),
        CarevaultError::NotFound(m) => CarevaultError::NotFound(format!("{context}: {m}")),
        CarevaultError::Export(m) => CarevaultError::Export(format!("{context}: {m}")),
        CarevaultError::Io(m) => CarevaultError::Io(format!("{context}: {m}")),
        other @ (CarevaultError::Authorization { .. } | CarevaultError::ConsentRequired) => other,
        other => CarevaultError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_context_keeps_variant() {
        let result: Result<()> = Err(CarevaultError::Connection("refused".to_string()));
        let err = result.context("Failed to open pool").unwrap_err();

        assert!(matches!(err, CarevaultError::Connection(_)));
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("Failed to open pool"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        let result: Result<i32> = Ok(42);
        let with_context = result.with_context(|| {
            called_clone.store(true, Ordering::SeqCst);
            "Expensive context"
        });

        assert!(with_context.is_ok());
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_context_chaining() {
        let result: Result<()> = Err(CarevaultError::Database("deadlock".to_string()));
        let err = result
            .context("Failed to update patient 3")
            .context("Bulk anonymization aborted")
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Bulk anonymization aborted"));
        assert!(msg.contains("Failed to update patient 3"));
        assert!(msg.contains("deadlock"));
    }

    #[test]
    fn test_io_error_with_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let result: std::result::Result<(), std::io::Error> = Err(io_error);
        let err = result.context("Failed to read carevault.toml").unwrap_err();

        assert!(matches!(err, CarevaultError::Io(_)));
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_consent_error_untouched() {
        let result: Result<()> = Err(CarevaultError::ConsentRequired);
        let err = result.context("view patients").unwrap_err();
        assert!(matches!(err, CarevaultError::ConsentRequired));
    }
}
