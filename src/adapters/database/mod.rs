//! Store abstraction layer
//!
//! Trait-based access to users, patients and audit events so the services
//! run unchanged against PostgreSQL or the in-memory store.

pub mod factory;
pub mod traits;

pub use factory::{create_stores, Stores};
pub use traits::{AuditStore, Backend, DatabaseClient, PatientStore, UserStore};
