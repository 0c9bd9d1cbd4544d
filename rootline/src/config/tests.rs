//! Configuration system tests

use super::*;
use crate::storage::config::{GraphStorageType, SurrealDBEngine};

#[test]
fn default_config_is_valid() {
    let config = RootlineConfig::default();
    assert!(validation::validate_config(&config).is_ok());
    assert_eq!(config.traversal.max_depth, 5);
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn builder_profiles_build() {
    let dev = ConfigBuilder::development().build().expect("development");
    assert_eq!(dev.storage.graph.storage_type, GraphStorageType::Memory);
    assert_eq!(dev.logging.level, LogLevel::Debug);

    let test = ConfigBuilder::testing().build().expect("testing");
    assert_eq!(test.storage.data_dir, std::path::PathBuf::from("./test_data"));

    let prod = ConfigBuilder::production().build().expect("production");
    assert_eq!(prod.storage.graph.storage_type, GraphStorageType::SurrealDB);
    assert_eq!(prod.storage.graph.surrealdb.engine, SurrealDBEngine::RocksDB);
    assert_eq!(prod.logging.format, LogFormat::Json);
}

#[test]
fn zero_traversal_depth_is_rejected() {
    let result = ConfigBuilder::development()
        .with_max_traversal_depth(0)
        .build();
    assert!(result.is_err());
}

#[test]
fn empty_surrealdb_namespace_is_rejected() {
    let mut config = RootlineConfig::default();
    config.storage.graph.surrealdb.namespace = String::new();
    assert!(validation::validate_config(&config).is_err());
}

#[test]
fn loader_round_trips_defaults() {
    let config = ConfigLoader::new().extract().expect("extract defaults");
    assert_eq!(config.traversal.max_depth, 5);
}

#[test]
fn loader_applies_toml_overlay() {
    use figment::providers::{Format, Toml};

    let mut loader = ConfigLoader::new();
    loader.merge(Toml::string(
        r#"
            [traversal]
            max_depth = 3

            [logging]
            level = "debug"
        "#,
    ));
    let config = loader.extract().expect("extract overlay");
    assert_eq!(config.traversal.max_depth, 3);
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn log_level_parses_from_strings() {
    use std::str::FromStr;
    assert_eq!(LogLevel::from_str("warn"), Ok(LogLevel::Warn));
    assert!(LogLevel::from_str("shout").is_err());
}
