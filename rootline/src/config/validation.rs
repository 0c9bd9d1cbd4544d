//! Configuration validation.

use super::{models::RootlineConfig, ConfigError, Result};
use crate::storage::config::GraphStorageType;

/// Validate a complete configuration.
pub fn validate_config(config: &RootlineConfig) -> Result<()> {
    validate_storage(config)?;
    validate_traversal(config)?;
    Ok(())
}

fn validate_storage(config: &RootlineConfig) -> Result<()> {
    match config.storage.graph.storage_type {
        GraphStorageType::Memory => Ok(()),
        GraphStorageType::SurrealDB => config
            .storage
            .graph
            .surrealdb
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string())),
    }
}

fn validate_traversal(config: &RootlineConfig) -> Result<()> {
    if config.traversal.max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "traversal.max_depth must be at least 1".to_string(),
        ));
    }
    Ok(())
}
