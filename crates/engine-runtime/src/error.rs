use crate::config::error::ConfigError;
use connectors::error::AdapterError;
use thiserror::Error;

/// Errors raised while preparing a run. Once tables are being copied,
/// failures are reported in the run summary instead.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Adapter-related error.
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}
