//! Shared Storage - SurrealDB implementation
//!
//! The SurrealDB-backed implementation of the family graph store. One
//! `SharedStorage` instance implements every store trait (`BaseStore`,
//! `MemberStore`, `RelationshipStore`, `FamilyStore`, `AttestationStore`)
//! against a single embedded or remote database, with the uniqueness
//! invariants (edge pairs, attestations, family names) enforced by `UNIQUE`
//! indexes in the schema.

use std::sync::Arc;

use surrealdb::Surreal;

#[cfg(feature = "surrealdb-remote")]
use crate::storage::config::{SurrealDBAuth, SurrealDBAuthType};
use crate::storage::config::{SurrealDBConfig, SurrealDBEngine};
use crate::storage::errors::StorageError;
use crate::storage::traits::FamilyGraphStore;

pub mod attestation;
pub mod base;
pub mod config;
pub mod family;
pub mod member;
pub mod relationship;
pub mod schema;

pub use base::*;
pub use config::*;

/// Type alias for embedded shared storage
#[cfg(feature = "surrealdb-embedded")]
pub type EmbeddedSharedStorage = SharedStorage<surrealdb::engine::local::Db>;

/// Create an embedded shared storage instance backed by RocksDB
#[cfg(feature = "surrealdb-embedded")]
pub async fn create_embedded_shared_storage(
    path: &str,
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    use surrealdb::engine::local::RocksDb;

    let client = Surreal::new::<RocksDb>(path).await.map_err(|e| {
        StorageError::Connection(format!("Failed to create embedded database: {}", e))
    })?;

    SharedStorage::new(client, config).await
}

/// Create a shared storage instance from configuration
pub async fn create_shared_store(
    config: &SurrealDBConfig,
) -> Result<Arc<dyn FamilyGraphStore>, StorageError> {
    config.validate()?;

    match config.engine {
        #[cfg(feature = "surrealdb-embedded")]
        SurrealDBEngine::Memory => {
            tracing::info!("Creating SharedStorage in-memory store");
            let client = Surreal::new::<surrealdb::engine::local::Mem>(())
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create memory client: {}", e))
                })?;

            let shared_config = SharedStorageConfig {
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            };
            let store = SharedStorage::new(client, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-embedded"))]
        SurrealDBEngine::Memory => Err(StorageError::Configuration(
            "Memory engine requires 'surrealdb-embedded' feature to be enabled".to_string(),
        )),
        #[cfg(feature = "surrealdb-embedded")]
        SurrealDBEngine::RocksDB => {
            tracing::info!(
                "Creating SharedStorage RocksDB store at {}",
                config.connection
            );
            let shared_config = SharedStorageConfig {
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            };
            let store = create_embedded_shared_storage(&config.connection, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-embedded"))]
        SurrealDBEngine::RocksDB => Err(StorageError::Configuration(
            "RocksDB engine requires 'surrealdb-embedded' feature to be enabled".to_string(),
        )),
        #[cfg(feature = "surrealdb-remote")]
        SurrealDBEngine::WebSocket => {
            tracing::info!(
                "Creating SharedStorage WebSocket connection to {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::remote::ws::Ws>(&config.connection)
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create WebSocket client: {}", e))
                })?;

            if let Some(auth) = &config.auth {
                authenticate_client(&client, auth, config).await?;
            }

            let shared_config = SharedStorageConfig {
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            };
            let store = SharedStorage::new(client, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-remote"))]
        SurrealDBEngine::WebSocket => Err(StorageError::Configuration(
            "WebSocket engine requires 'surrealdb-remote' feature to be enabled".to_string(),
        )),
        #[cfg(feature = "surrealdb-remote")]
        SurrealDBEngine::Http => {
            tracing::info!(
                "Creating SharedStorage HTTP connection to {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::remote::http::Http>(&config.connection)
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create HTTP client: {}", e))
                })?;

            if let Some(auth) = &config.auth {
                authenticate_client(&client, auth, config).await?;
            }

            let shared_config = SharedStorageConfig {
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            };
            let store = SharedStorage::new(client, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-remote"))]
        SurrealDBEngine::Http => Err(StorageError::Configuration(
            "HTTP engine requires 'surrealdb-remote' feature to be enabled".to_string(),
        )),
    }
}

/// Authenticate with a SurrealDB client
#[cfg(feature = "surrealdb-remote")]
pub async fn authenticate_client<C>(
    client: &Surreal<C>,
    auth: &SurrealDBAuth,
    config: &SurrealDBConfig,
) -> Result<(), StorageError>
where
    C: surrealdb::Connection,
{
    match auth.auth_type {
        SurrealDBAuthType::Root => {
            tracing::debug!("Authenticating as root user");
            if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
                let root = surrealdb::opt::auth::Root { username, password };
                client
                    .signin(root)
                    .await
                    .map_err(|e| StorageError::Authentication(format!("Root auth failed: {}", e)))?;
            }
        }
        SurrealDBAuthType::Namespace => {
            tracing::debug!("Authenticating as namespace user");
            if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
                let ns_auth = surrealdb::opt::auth::Namespace {
                    namespace: &config.namespace,
                    username,
                    password,
                };
                client.signin(ns_auth).await.map_err(|e| {
                    StorageError::Authentication(format!("Namespace auth failed: {}", e))
                })?;
            }
        }
        SurrealDBAuthType::Database => {
            tracing::debug!("Authenticating as database user");
            if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
                let db_auth = surrealdb::opt::auth::Database {
                    namespace: &config.namespace,
                    database: &config.database,
                    username,
                    password,
                };
                client.signin(db_auth).await.map_err(|e| {
                    StorageError::Authentication(format!("Database auth failed: {}", e))
                })?;
            }
        }
        SurrealDBAuthType::Jwt => {
            tracing::debug!("Authenticating with JWT token");
            if let Some(token) = &auth.token {
                client
                    .authenticate(token.clone())
                    .await
                    .map_err(|e| StorageError::Authentication(format!("JWT auth failed: {}", e)))?;
            }
        }
    }
    Ok(())
}
