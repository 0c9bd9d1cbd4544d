//! Configuration for the shared storage implementation

/// Runtime configuration for a `SharedStorage` instance
#[derive(Debug, Clone)]
pub struct SharedStorageConfig {
    /// SurrealDB namespace to use
    pub namespace: String,

    /// SurrealDB database to use
    pub database: String,
}

impl Default for SharedStorageConfig {
    fn default() -> Self {
        Self {
            namespace: "rootline".to_string(),
            database: "main".to_string(),
        }
    }
}
