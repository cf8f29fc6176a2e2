//! Store integrations for CareVault.
//!
//! - [`database`] - store traits and the factory selecting a backend
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - in-memory implementation with fault injection
//!
//! # Example
//!
//! ```rust,no_run
//! use carevault::adapters::database::create_stores;
//! use carevault::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carevault.toml")?;
//! let stores = create_stores(&config)?;
//! stores.client.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
