//! Store and registry factory
//!
//! Builds the configured exhibition store and venue registry.

use super::memory::InMemoryStore;
use super::traits::ExhibitionStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore, PostgreSQLVenueRegistry};
use crate::adapters::registry::{FileVenueRegistry, VenueRegistry};
use crate::config::schema::{CuratorConfig, PostgreSQLConfig, RegistrySource, StoreBackend};
use crate::domain::{CuratorError, Result};
use std::sync::Arc;

/// Shared handle to the configured exhibition store
pub type SharedStore = Arc<dyn ExhibitionStore + Send + Sync>;

/// Shared handle to the configured venue registry
pub type SharedRegistry = Arc<dyn VenueRegistry + Send + Sync>;

fn postgresql_config(config: &CuratorConfig) -> Result<&PostgreSQLConfig> {
    config.postgresql.as_ref().ok_or_else(|| {
        CuratorError::Configuration("[postgresql] section is required".to_string())
    })
}

fn build_store(config: &CuratorConfig, pg_client: Option<Arc<PostgreSQLClient>>) -> Result<SharedStore> {
    let store = &config.store;
    match store.backend {
        StoreBackend::Memory => {
            tracing::info!("Creating in-memory exhibition store");
            Ok(Arc::new(InMemoryStore::with_limits(
                store.max_transaction_attempts,
                store.max_operations_per_transaction,
            )))
        }
        StoreBackend::PostgreSQL => {
            let client = pg_client.ok_or_else(|| {
                CuratorError::Configuration("[postgresql] section is required".to_string())
            })?;
            tracing::info!(
                target = %client.connection_string_safe(),
                "Creating PostgreSQL exhibition store"
            );
            Ok(Arc::new(PostgreSQLStore::new(
                client,
                store.max_transaction_attempts,
                store.max_operations_per_transaction,
            )))
        }
    }
}

fn build_registry(config: &CuratorConfig, pg_client: Option<Arc<PostgreSQLClient>>) -> Result<SharedRegistry> {
    match config.registry.source {
        RegistrySource::File => {
            tracing::info!(path = %config.registry.path, "Using file venue registry");
            Ok(Arc::new(FileVenueRegistry::new(&config.registry.path)))
        }
        RegistrySource::PostgreSQL => {
            let client = pg_client.ok_or_else(|| {
                CuratorError::Configuration("[postgresql] section is required".to_string())
            })?;
            tracing::info!("Using PostgreSQL venue registry");
            Ok(Arc::new(PostgreSQLVenueRegistry::new(client)))
        }
    }
}

fn needs_postgresql(config: &CuratorConfig) -> bool {
    config.store.backend == StoreBackend::PostgreSQL
        || config.registry.source == RegistrySource::PostgreSQL
}

async fn postgresql_client(config: &CuratorConfig) -> Result<Option<Arc<PostgreSQLClient>>> {
    if !needs_postgresql(config) {
        return Ok(None);
    }
    let client = PostgreSQLClient::new(postgresql_config(config)?.clone()).await?;
    Ok(Some(Arc::new(client)))
}

/// Create the exhibition store named by the configuration
///
/// # Errors
///
/// Returns an error if the store cannot be created
pub async fn create_store(config: &CuratorConfig) -> Result<SharedStore> {
    let client = if config.store.backend == StoreBackend::PostgreSQL {
        postgresql_client(config).await?
    } else {
        None
    };
    build_store(config, client)
}

/// Create the venue registry named by the configuration
///
/// # Errors
///
/// Returns an error if the registry cannot be created
pub async fn create_registry(config: &CuratorConfig) -> Result<SharedRegistry> {
    let client = if config.registry.source == RegistrySource::PostgreSQL {
        postgresql_client(config).await?
    } else {
        None
    };
    build_registry(config, client)
}

/// Create the store and the registry, sharing one connection pool when both
/// use PostgreSQL
///
/// # Errors
///
/// Returns an error if either cannot be created
pub async fn create_store_and_registry(
    config: &CuratorConfig,
) -> Result<(SharedStore, SharedRegistry)> {
    let client = postgresql_client(config).await?;
    let store = build_store(config, client.clone())?;
    let registry = build_registry(config, client)?;
    Ok((store, registry))
}
