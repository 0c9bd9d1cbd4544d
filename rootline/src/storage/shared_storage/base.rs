//! Base shared storage implementation

use async_trait::async_trait;
use surrealdb::{Connection, RecordId, Surreal};

use super::config::SharedStorageConfig;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// SurrealDB-backed family graph store
#[derive(Debug)]
pub struct SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SharedStorageConfig,
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new shared storage instance
    pub async fn new(client: Surreal<C>, config: SharedStorageConfig) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let storage = Self { client, config };

        storage.initialize_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema with all required tables
    async fn initialize_schema(&self) -> Result<(), StorageError> {
        super::schema::initialize_schema(&self.client).await
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }
}

/// Extract the plain key string from a SurrealDB record id
///
/// `RecordId::key().to_string()` wraps non-trivial keys in ⟨⟩ brackets; the
/// stored ids are plain strings, so strip them back off.
pub(crate) fn record_key(id: &RecordId) -> String {
    let key_string = id.key().to_string();
    key_string
        .strip_prefix('⟨')
        .and_then(|s| s.strip_suffix('⟩'))
        .unwrap_or(&key_string)
        .to_string()
}

/// Quote a list of ids for an `IN [...]` clause
pub(crate) fn quoted_id_list(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("'{}'", id.replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl<C> BaseStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        let _result = self
            .client
            .query("INFO FOR DB")
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let queries = [
            "DELETE FROM attestation",
            "DELETE FROM relationship",
            "DELETE FROM member",
            "DELETE FROM family",
        ];

        for query in queries {
            self.client
                .query(query)
                .await
                .map_err(|e| StorageError::Query(format!("Failed to clear table: {}", e)))?;
        }

        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "shared_storage",
            "namespace": self.config.namespace,
            "database": self.config.database,
            "engine": "surrealdb",
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // SurrealDB connections are automatically closed when dropped
        Ok(())
    }
}
