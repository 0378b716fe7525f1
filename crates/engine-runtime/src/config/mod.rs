pub mod env;
pub mod error;

use crate::config::{env::expand_placeholders, error::ConfigError};
use connectors::adapter::DataFormat;
use engine_processing::sink::destination::WriteMode;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

fn default_format() -> DataFormat {
    DataFormat::MsSql
}

/// One side of the migration: which store and how to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default = "default_format", alias = "Format")]
    pub format: DataFormat,

    #[serde(alias = "Connection", alias = "connection_string")]
    pub connection: String,
}

impl Endpoint {
    fn mssql(connection: String) -> Self {
        Endpoint {
            format: DataFormat::MsSql,
            connection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct MigratorConfig {
    pub source: Endpoint,
    pub destination: Endpoint,

    /// Rows per page; also the offset step.
    pub batch_size: usize,

    pub tables: Vec<String>,

    /// Where replay files go. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,

    pub write_mode: WriteMode,
}

/// `appsettings.json` style connection block. Both entries are SQL Server.
#[derive(Debug, Default, Deserialize)]
struct ConnectionStrings {
    #[serde(rename = "SourceConnection")]
    source: Option<String>,

    #[serde(rename = "DestinationConnection")]
    destination: Option<String>,
}

/// Accepted file shape. Endpoints come from `source`/`destination` or,
/// when those are absent, from `ConnectionStrings`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, alias = "Source")]
    source: Option<Endpoint>,

    #[serde(default, alias = "Destination")]
    destination: Option<Endpoint>,

    #[serde(default, rename = "ConnectionStrings")]
    connection_strings: ConnectionStrings,

    #[serde(alias = "BatchNumber")]
    batch_size: usize,

    #[serde(alias = "Tables")]
    tables: Vec<String>,

    #[serde(default, alias = "OutputDir")]
    output_dir: Option<PathBuf>,

    #[serde(default, alias = "WriteMode")]
    write_mode: WriteMode,
}

impl TryFrom<RawConfig> for MigratorConfig {
    type Error = String;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let source = raw
            .source
            .or_else(|| raw.connection_strings.source.map(Endpoint::mssql))
            .ok_or("missing source: set `source` or `ConnectionStrings.SourceConnection`")?;
        let destination = raw
            .destination
            .or_else(|| raw.connection_strings.destination.map(Endpoint::mssql))
            .ok_or(concat!(
                "missing destination: set `destination` or ",
                "`ConnectionStrings.DestinationConnection`"
            ))?;

        Ok(MigratorConfig {
            source,
            destination,
            batch_size: raw.batch_size,
            tables: raw.tables,
            output_dir: raw.output_dir,
            write_mode: raw.write_mode,
        })
    }
}

impl MigratorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&content)
    }

    /// Expands `${VAR}` placeholders in both connection strings.
    pub fn expand_env(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        let lookup = |name: &str| vars.get(name).cloned();
        self.source.connection = expand_placeholders(&self.source.connection, lookup)?;
        self.destination.connection = expand_placeholders(&self.destination.connection, lookup)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "batch_size must be greater than zero".into(),
            ));
        }
        if self.tables.is_empty() {
            return Err(ConfigError::Invalid("no tables configured".into()));
        }
        if let Some(pos) = self.tables.iter().position(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "table name at position {pos} is blank"
            )));
        }
        // SQL Server resolves names case-insensitively under default collations
        let mut seen = HashSet::new();
        if let Some(dup) = self
            .tables
            .iter()
            .find(|t| !seen.insert(t.trim().to_ascii_lowercase()))
        {
            return Err(ConfigError::Invalid(format!(
                "table {dup} is listed more than once"
            )));
        }
        if self.source.connection.trim().is_empty() {
            return Err(ConfigError::Invalid("source connection is empty".into()));
        }
        if self.destination.connection.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "destination connection is empty".into(),
            ));
        }
        if !self.destination.format.supports_writes() {
            return Err(ConfigError::Invalid(format!(
                "{} cannot be used as a destination",
                self.destination.format
            )));
        }
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Table names in processing order: ascending ordinal comparison.
    pub fn ordered_tables(&self) -> Vec<String> {
        let mut tables = self.tables.clone();
        tables.sort();
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "source": { "format": "mssql", "connection": "Server=${SRC_HOST};Database=legacy" },
        "destination": { "connection": "Server=dst;Database=app" },
        "BatchNumber": 500,
        "tables": ["Users", "Orders"]
    }"#;

    #[test]
    fn test_parse_with_legacy_batch_key_and_defaults() {
        let config = MigratorConfig::from_json(CONFIG).unwrap();

        assert_eq!(config.batch_size, 500);
        assert_eq!(config.destination.format, DataFormat::MsSql);
        assert_eq!(config.write_mode, WriteMode::Parameterized);
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_expand_env_in_connections() {
        let mut config = MigratorConfig::from_json(CONFIG).unwrap();
        let vars = HashMap::from([("SRC_HOST".to_string(), "old-db".to_string())]);

        config.expand_env(&vars).unwrap();

        assert_eq!(config.source.connection, "Server=old-db;Database=legacy");
        assert_eq!(config.destination.connection, "Server=dst;Database=app");
    }

    #[test]
    fn test_ordered_tables_is_ordinal() {
        let mut config = MigratorConfig::from_json(CONFIG).unwrap();
        config.tables = vec!["Users".into(), "orders".into(), "Orders".into()];

        assert_eq!(config.ordered_tables(), vec!["Orders", "Users", "orders"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = MigratorConfig::from_json(CONFIG).unwrap();

        let mut config = base.clone();
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.tables.clear();
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.tables.push("  ".into());
        assert!(config.validate().is_err());

        let mut config = base;
        config.destination.format = DataFormat::Postgres;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_write_mode_and_output_dir() {
        let json = r#"{
            "source": { "format": "pg", "connection": "host=localhost dbname=legacy" },
            "destination": { "format": "mssql", "connection": "Server=dst" },
            "batch_size": 10,
            "tables": ["A"],
            "output_dir": "replay",
            "write_mode": "script"
        }"#;
        let config = MigratorConfig::from_json(json).unwrap();

        assert_eq!(config.source.format, DataFormat::Postgres);
        assert_eq!(config.write_mode, WriteMode::Script);
        assert_eq!(config.output_dir(), PathBuf::from("replay"));
    }

    #[test]
    fn test_validate_rejects_duplicate_tables() {
        let mut config = MigratorConfig::from_json(CONFIG).unwrap();
        config.tables = vec!["Users".into(), "Orders".into(), "users".into()];

        match config.validate() {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("users")),
            other => panic!("expected duplicate rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_appsettings_connection_strings() {
        let json = r#"{
            "ConnectionStrings": {
                "SourceConnection": "Server=old;Database=legacy",
                "DestinationConnection": "Server=new;Database=app"
            },
            "BatchNumber": 1000,
            "Tables": ["Users"]
        }"#;
        let config = MigratorConfig::from_json(json).unwrap();

        assert_eq!(config.source.format, DataFormat::MsSql);
        assert_eq!(config.source.connection, "Server=old;Database=legacy");
        assert_eq!(config.destination.connection, "Server=new;Database=app");
        assert_eq!(config.batch_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_destination_fails_to_parse() {
        let json = r#"{
            "ConnectionStrings": { "SourceConnection": "Server=old" },
            "BatchNumber": 1000,
            "Tables": ["Users"]
        }"#;
        match MigratorConfig::from_json(json) {
            Err(ConfigError::Parse(err)) => {
                assert!(err.to_string().contains("missing destination"))
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_fails_to_parse() {
        let json = CONFIG.replace("\"mssql\"", "\"oracle\"");
        assert!(matches!(
            MigratorConfig::from_json(&json),
            Err(ConfigError::Parse(_))
        ));
    }
}
