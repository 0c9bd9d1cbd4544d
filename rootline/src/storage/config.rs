//! Configuration structures for storage backends

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::storage::errors::StorageError;

/// Supported graph storage backend types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GraphStorageType {
    /// SurrealDB (embedded or remote graph database)
    SurrealDB,

    /// In-process memory store (for testing and development)
    Memory,
}

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Connection string for remote or path for embedded
    pub connection: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,

    /// Authentication information
    pub auth: Option<SurrealDBAuth>,

    /// Common storage settings
    pub settings: Option<CommonStorageSettings>,
}

/// SurrealDB engine types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
    /// Remote WebSocket connection
    WebSocket,
    /// Remote HTTP connection
    Http,
}

/// SurrealDB authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrealDBAuth {
    /// Authentication type
    pub auth_type: SurrealDBAuthType,

    /// Username (for root/namespace/database auth)
    pub username: Option<String>,

    /// Password (for root/namespace/database auth)
    pub password: Option<String>,

    /// Token (for JWT auth)
    pub token: Option<String>,
}

/// SurrealDB authentication types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurrealDBAuthType {
    /// Root user authentication
    Root,
    /// Namespace user authentication
    Namespace,
    /// Database user authentication
    Database,
    /// JWT token authentication
    Jwt,
}

/// Common storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonStorageSettings {
    /// Connection timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Additional configuration parameters
    pub params: HashMap<String, String>,
}

impl SurrealDBConfig {
    /// Validate the storage configuration
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.connection.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB connection string cannot be empty".to_string(),
            ));
        }
        if self.namespace.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB namespace cannot be empty".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB database cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::Memory,
            connection: "memory".to_string(),
            namespace: "rootline".to_string(),
            database: "main".to_string(),
            auth: None,
            settings: None,
        }
    }
}
