//! Configuration management for CareVault.
//!
//! CareVault reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CAREVAULT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use carevault::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carevault.toml")?;
//! println!("Retention window: {} days", config.retention.window_days);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - `environment` - development, staging or production
//! - `database_target` - `postgresql` or `memory`
//! - [`PostgreSQLConfig`] - connection pool settings
//! - [`SecurityConfig`] - field encryption key
//! - [`RetentionConfig`] - retention window
//! - [`ExportConfig`] - CSV output directory and audit row limit
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [postgresql]
//! connection_string = "${CAREVAULT_PG_URL}"
//!
//! [security]
//! encryption_key = "${CAREVAULT_ENCRYPTION_KEY}"
//!
//! [retention]
//! window_days = 90
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CarevaultConfig, DatabaseTarget, Environment, ExportConfig, LoggingConfig,
    PostgreSQLConfig, RetentionConfig, SecurityConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
