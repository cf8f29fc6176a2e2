//! Store factory
//!
//! Builds the store bundle for the configured `database_target`.

use crate::adapters::database::traits::{
    AuditStore, Backend, DatabaseClient, PatientStore, UserStore,
};
use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{CarevaultConfig, DatabaseTarget};
use crate::domain::{CarevaultError, Result};
use std::sync::Arc;

/// Handles to one backend through each store trait
#[derive(Clone)]
pub struct Stores {
    pub client: Arc<dyn DatabaseClient>,
    pub users: Arc<dyn UserStore>,
    pub patients: Arc<dyn PatientStore>,
    pub audit: Arc<dyn AuditStore>,
}

impl Stores {
    /// Share one backend across all four handles
    pub fn from_backend<B: Backend + 'static>(backend: Arc<B>) -> Self {
        Self {
            client: backend.clone(),
            users: backend.clone(),
            patients: backend.clone(),
            audit: backend,
        }
    }

    /// Fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }
}

/// Create the stores selected by the configuration
///
/// # Errors
///
/// Returns an error if the PostgreSQL section is missing or its pool
/// cannot be built. No connection is attempted here.
pub fn create_stores(config: &CarevaultConfig) -> Result<Stores> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                CarevaultError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = PostgreSQLClient::new(pg_config.clone())?;
            Ok(Stores::from_backend(Arc::new(PostgreSQLAdapter::new(
                client,
            ))))
        }
        DatabaseTarget::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on exit");
            Ok(Stores::in_memory())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_memory_target() {
        let config = parse_config("database_target = \"memory\"").unwrap();
        let stores = create_stores(&config).unwrap();
        assert_eq!(stores.client.backend_name(), "memory");
    }

    #[test]
    fn test_postgresql_target_requires_section() {
        let mut config = parse_config("database_target = \"memory\"").unwrap();
        config.database_target = DatabaseTarget::PostgreSQL;
        assert!(matches!(
            create_stores(&config),
            Err(CarevaultError::Configuration(_))
        ));
    }
}
