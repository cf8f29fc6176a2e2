// CareVault - Role-gated hospital records
// Copyright (c) 2025 CareVault Contributors
// Licensed under the MIT License

//! # CareVault - Role-gated hospital records
//!
//! CareVault keeps patient records behind a role-based access model with
//! GDPR-style consent gating, pseudonymization, field encryption, an
//! append-only audit log and retention enforcement.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (access, audit, retention, analytics, export)
//! - [`anonymization`] - Pseudonyms, contact masking and the anonymization engine
//! - [`adapters`] - Storage backends (PostgreSQL, in-memory)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carevault::config::load_config;
//! use carevault::core::dashboard::{Command, Dashboard};
//! use carevault::core::access::ViewMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("carevault.toml")?;
//!     let dashboard = Dashboard::from_config(&config)?;
//!     dashboard.bootstrap().await?;
//!
//!     let Some(mut session) = dashboard.login("admin", "admin123").await? else {
//!         return Ok(());
//!     };
//!     dashboard.execute(&mut session, Command::GiveConsent).await?;
//!     let output = dashboard
//!         .execute(&mut session, Command::ViewPatients { mode: ViewMode::Raw })
//!         .await?;
//!     println!("{output:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Access model
//!
//! | Role         | Patient view                         | Writes                          |
//! |--------------|--------------------------------------|---------------------------------|
//! | admin        | full rows, or masked at read time    | everything                      |
//! | doctor       | anonymized rows only                 | none                            |
//! | receptionist | identity columns, diagnosis hidden   | add patient                     |
//!
//! Every operation except consent and logout requires consent for the
//! session. Successful operations are recorded in the audit log after
//! their effect is committed.
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type is
//! [`domain::CarevaultError`]. The CLI maps error categories to exit codes
//! with [`domain::CarevaultError::exit_code`].

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
