use connectors::error::AdapterError;
use engine_runtime::{config::error::ConfigError, error::MigrationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load the migration config: {0}")]
    MigratorConfig(#[from] ConfigError),

    #[error("Failed to run the migration: {0}")]
    Runner(#[from] MigrationError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Invalid row JSON: {0}")]
    InvalidRow(String),

    #[error("Invalid connection format provided: {0}")]
    InvalidConnectionFormat(String),

    #[error("Connection check failed: {0}")]
    Adapter(#[from] AdapterError),
}
