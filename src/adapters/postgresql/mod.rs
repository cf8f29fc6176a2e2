//! PostgreSQL store
//!
//! Pooled `tokio-postgres` connections via `deadpool-postgres`. Bulk
//! anonymization, retention purge and account seeding each run inside one
//! transaction.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
