//! Core business logic for CareVault.
//!
//! # Modules
//!
//! - [`auth`] - password digests, authentication and account seeding
//! - [`audit`] - append-only audit trail
//! - [`access`] - per-role projection of patient rows
//! - [`records`] - patient creation and decryption
//! - [`encryption`] - AES-256-GCM field cipher
//! - [`retention`] - retention deadlines and purge
//! - [`analytics`] - activity charts and overview metrics
//! - [`export`] - CSV exports and system backup
//! - [`dashboard`] - command table and dispatcher
//!
//! # Request Flow
//!
//! 1. **Login**: credentials are checked and a [`SessionContext`] is opened
//! 2. **Consent**: patient data stays closed until consent is recorded
//! 3. **Dispatch**: the command's role gate runs, then the operation
//! 4. **Audit**: the events returned by the operation are appended
//!
//! # Example
//!
//! ```rust,no_run
//! use carevault::config::load_config;
//! use carevault::core::dashboard::{Command, Dashboard};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carevault.toml")?;
//! let dashboard = Dashboard::from_config(&config)?;
//! dashboard.bootstrap().await?;
//!
//! if let Some(mut session) = dashboard.login("admin", "admin123").await? {
//!     dashboard.execute(&mut session, Command::GiveConsent).await?;
//!     dashboard.execute(&mut session, Command::PurgeExpired).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`SessionContext`]: crate::domain::SessionContext

pub mod access;
pub mod analytics;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod encryption;
pub mod export;
pub mod records;
pub mod retention;
