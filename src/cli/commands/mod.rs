//! CLI command implementations
//!
//! `init`, `validate-config` and `setup` work on the configuration and
//! store directly; every other command runs inside an authenticated
//! session (see [`session`]).

pub mod audit;
pub mod backup;
pub mod init;
pub mod patients;
pub mod reports;
pub mod retention;
pub mod session;
pub mod setup;
pub mod validate;
