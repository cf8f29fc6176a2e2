//! Domain models and types for CareVault.
//!
//! This module contains the records, identities and rules shared by every
//! other layer:
//!
//! - **Strongly-typed identifiers** ([`PatientId`], [`UserId`])
//! - **Accounts and sessions** ([`Role`], [`Identity`], [`SessionContext`])
//! - **Patient rows** ([`PatientRecord`] and the narrower per-role shapes)
//! - **Audit events** ([`AuditAction`], [`NewAuditEvent`], [`AuditEntry`])
//! - **Time** ([`Clock`], [`SystemClock`], [`FixedClock`])
//! - **Errors** ([`CarevaultError`], [`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CarevaultError>`]:
//!
//! ```rust,no_run
//! use carevault::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = carevault::config::load_config("carevault.toml")?;
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod clock;
pub mod context;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;
pub mod role;
pub mod session;
pub mod user;

pub use audit::{
    ActionCount, AuditAction, AuditEntry, AuditFilter, AuditInsert, NewAuditEvent, Outcome,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::CarevaultError;
pub use ids::{PatientId, UserId};
pub use patient::{
    AnonymizationCandidate, AnonymizationUpdate, AnonymizedPatientRow, EncryptedIdentity,
    ExpiredPatient, NewPatient, PatientCounts, PatientInsert, PatientRecord, PatientSummaryRow,
};
pub use result::Result;
pub use role::Role;
pub use session::SessionContext;
pub use user::{Identity, NewUser, UserRecord};
