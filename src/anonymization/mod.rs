//! Anonymization module for CareVault
//!
//! Pseudonymizes patient identity in place. The masked values are written
//! next to the raw columns (anonymization is additive) and the row's
//! `is_anonymized` flag is set in the same statement.
//!
//! # Architecture
//!
//! - **Anonymizer**: pure masking functions ([`anonymize_name`], [`anonymize_contact`])
//! - **Engine**: single-record and bulk anonymization against the patient store
//!
//! # Usage
//!
//! ```rust,no_run
//! use carevault::anonymization::{anonymize_contact, anonymize_name};
//! use carevault::domain::PatientId;
//!
//! assert_eq!(anonymize_name("Jane Roe", PatientId::new(7)), "ANON_0007");
//! assert_eq!(anonymize_contact("555-867-5309"), "XXX-XXX-5309");
//! ```

pub mod anonymizer;
pub mod engine;

pub use anonymizer::{anonymize_contact, anonymize_name, masked_update};
pub use engine::AnonymizationEngine;
