//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use std::path::{Path, PathBuf};

use super::{models::*, validation, Result};
use crate::storage::config::{GraphStorageType, SurrealDBConfig, SurrealDBEngine};

/// Builder for creating RootlineConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: RootlineConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: RootlineConfig::default(),
        }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use default storage configuration (embedded SurrealDB on RocksDB)
    pub fn with_default_storage(mut self) -> Self {
        if self.config.storage.data_dir == PathBuf::from("./data") {
            let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            self.config.storage.data_dir = home_dir.join(".rootline").join("data");
        }

        self.config.storage.graph.storage_type = GraphStorageType::SurrealDB;
        self.config.storage.graph.surrealdb = SurrealDBConfig {
            engine: SurrealDBEngine::RocksDB,
            connection: self
                .config
                .storage
                .data_dir
                .join("graph")
                .to_string_lossy()
                .to_string(),
            namespace: "rootline".to_string(),
            database: "main".to_string(),
            auth: None,
            settings: None,
        };

        self
    }

    /// Use the in-process memory store (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.graph.storage_type = GraphStorageType::Memory;
        self
    }

    /// Use the embedded SurrealDB engine with in-memory persistence
    pub fn with_surrealdb_memory_engine(mut self) -> Self {
        self.config.storage.graph.storage_type = GraphStorageType::SurrealDB;
        self.config.storage.graph.surrealdb.engine = SurrealDBEngine::Memory;
        self
    }

    /// Set the traversal depth bound for ancestor/descendant queries.
    pub fn with_max_traversal_depth(mut self, max_depth: u8) -> Self {
        self.config.traversal.max_depth = max_depth;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use default logging configuration (JSON to stdout at Info level)
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging.level = LogLevel::Info;
        self.config.logging.format = LogFormat::Json;
        self.config.logging.file = None;

        self
    }

    /// Create a configuration for development.
    ///
    /// In-process memory storage, debug-level logging.
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for testing.
    ///
    /// Like development, with a test-local data directory.
    pub fn testing() -> Self {
        Self::development().with_data_dir(PathBuf::from("./test_data"))
    }

    /// Create a production-ready configuration with persistent storage.
    pub fn production() -> Self {
        Self::new().with_default_storage().with_default_logging()
    }

    /// Create a fully default configuration suitable for most uses
    pub fn defaults() -> Self {
        Self::production().with_remote_surrealdb_if_configured()
    }

    /// Configure SurrealDB to use a remote connection if environment
    /// variables are set
    pub fn with_remote_surrealdb_if_configured(mut self) -> Self {
        if let Ok(connection_url) = std::env::var("SURREALDB_URL") {
            tracing::info!(
                "Configuring SurrealDB remote connection to: {}",
                connection_url
            );

            let engine =
                if connection_url.starts_with("ws://") || connection_url.starts_with("wss://") {
                    SurrealDBEngine::WebSocket
                } else {
                    SurrealDBEngine::Http
                };

            let namespace =
                std::env::var("SURREALDB_NAMESPACE").unwrap_or_else(|_| "rootline".to_string());
            let database =
                std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| "main".to_string());

            let auth = if let (Ok(username), Ok(password)) = (
                std::env::var("SURREALDB_USERNAME"),
                std::env::var("SURREALDB_PASSWORD"),
            ) {
                Some(crate::storage::config::SurrealDBAuth {
                    auth_type: crate::storage::config::SurrealDBAuthType::Root,
                    username: Some(username),
                    password: Some(password),
                    token: None,
                })
            } else {
                None
            };

            self.config.storage.graph.surrealdb = SurrealDBConfig {
                engine,
                connection: connection_url,
                namespace,
                database,
                auth,
                settings: None,
            };
        }

        self
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<RootlineConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
