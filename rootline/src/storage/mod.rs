//! Storage abstractions and implementations
//!
//! This module provides trait definitions and implementations for the family
//! graph store used by Rootline.
//!
//! ## Storage Implementations
//!
//! - **SharedStorage**: SurrealDB-backed store (embedded in-memory or RocksDB
//!   engines, remote connections behind the `surrealdb-remote` feature)
//!   implementing every store trait.
//! - **InMemoryStore**: process-local store for testing and development.

pub mod config;
pub mod errors;
pub mod filters;
pub mod memory;
pub mod models;
#[cfg(any(feature = "surrealdb-embedded", feature = "surrealdb-remote"))]
pub mod shared_storage;
pub mod traits;

// Re-export common types for convenience
pub use config::{GraphStorageType, SurrealDBAuth, SurrealDBAuthType, SurrealDBConfig, SurrealDBEngine};
pub use errors::StorageError;
pub use filters::{AttestationFilter, MemberFilter, RelationshipFilter};
pub use memory::InMemoryStore;
pub use models::{Attestation, AttestationTarget, Relationship, RelationshipKind};
pub use traits::{
    AttestationStore, BaseStore, FamilyGraphStore, FamilyStore, MemberStore, RelationshipStore,
};

#[cfg(any(feature = "surrealdb-embedded", feature = "surrealdb-remote"))]
pub use shared_storage::{SharedStorage, SharedStorageConfig};

#[cfg(feature = "surrealdb-embedded")]
pub use shared_storage::EmbeddedSharedStorage;

use std::sync::Arc;

/// Create the configured storage backend
///
/// The in-process memory store is always available; SurrealDB engines require
/// the matching cargo feature.
pub async fn create_storage_service(
    config: &crate::config::RootlineConfig,
) -> Result<Arc<dyn traits::FamilyGraphStore>, StorageError> {
    match config.storage.graph.storage_type {
        GraphStorageType::Memory => {
            tracing::info!("Creating in-process memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(any(feature = "surrealdb-embedded", feature = "surrealdb-remote"))]
        GraphStorageType::SurrealDB => {
            let store = shared_storage::create_shared_store(&config.storage.graph.surrealdb).await?;
            Ok(store)
        }
        #[cfg(not(any(feature = "surrealdb-embedded", feature = "surrealdb-remote")))]
        GraphStorageType::SurrealDB => Err(StorageError::Configuration(
            "SurrealDB storage requires the 'surrealdb-embedded' or 'surrealdb-remote' feature"
                .to_string(),
        )),
    }
}
