use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingVariable(String),

    #[error("Unterminated placeholder in '{0}'")]
    UnterminatedPlaceholder(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
