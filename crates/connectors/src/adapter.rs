use crate::{
    error::AdapterError,
    sql::{
        base::{destination::DbDataDestination, source::DbDataSource},
        mssql::adapter::MsSqlAdapter,
        postgres::adapter::PgAdapter,
    },
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[serde(alias = "sqlserver")]
    MsSql,
    #[serde(alias = "pg", alias = "postgresql")]
    Postgres,
}

impl DataFormat {
    pub fn supports_writes(&self) -> bool {
        matches!(self, DataFormat::MsSql)
    }
}

impl FromStr for DataFormat {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mssql" | "sqlserver" => Ok(DataFormat::MsSql),
            "pg" | "postgres" | "postgresql" => Ok(DataFormat::Postgres),
            other => Err(AdapterError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::MsSql => write!(f, "SQL Server"),
            DataFormat::Postgres => write!(f, "Postgres"),
        }
    }
}

#[derive(Clone)]
pub enum Adapter {
    MsSql(MsSqlAdapter),
    Postgres(PgAdapter),
}

impl Adapter {
    /// Parses the connection string for `format`. No connection is opened here.
    pub fn sql(format: DataFormat, conn_str: &str) -> Result<Self, AdapterError> {
        match format {
            DataFormat::MsSql => Ok(Adapter::MsSql(MsSqlAdapter::new(conn_str)?)),
            DataFormat::Postgres => Ok(Adapter::Postgres(PgAdapter::new(conn_str)?)),
        }
    }

    pub fn format(&self) -> DataFormat {
        match self {
            Adapter::MsSql(_) => DataFormat::MsSql,
            Adapter::Postgres(_) => DataFormat::Postgres,
        }
    }

    pub fn source(&self) -> Arc<dyn DbDataSource> {
        match self {
            Adapter::MsSql(adapter) => Arc::new(adapter.clone()),
            Adapter::Postgres(adapter) => Arc::new(adapter.clone()),
        }
    }

    pub fn destination(&self) -> Result<Arc<dyn DbDataDestination>, AdapterError> {
        match self {
            Adapter::MsSql(adapter) => Ok(Arc::new(adapter.clone())),
            Adapter::Postgres(_) => Err(AdapterError::UnsupportedDestination(
                self.format().to_string(),
            )),
        }
    }

    pub async fn ping(&self) -> Result<(), AdapterError> {
        match self {
            Adapter::MsSql(adapter) => adapter.ping().await?,
            Adapter::Postgres(adapter) => adapter.ping().await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_format_from_str() {
        assert_eq!("MSSQL".parse::<DataFormat>().unwrap(), DataFormat::MsSql);
        assert_eq!("sqlserver".parse::<DataFormat>().unwrap(), DataFormat::MsSql);
        assert_eq!("pg".parse::<DataFormat>().unwrap(), DataFormat::Postgres);
        assert!("oracle".parse::<DataFormat>().is_err());
    }

    #[test]
    fn test_postgres_is_source_only() {
        let adapter = Adapter::sql(
            DataFormat::Postgres,
            "host=localhost user=postgres dbname=app",
        )
        .unwrap();

        assert!(!DataFormat::Postgres.supports_writes());
        assert!(matches!(
            adapter.destination(),
            Err(AdapterError::UnsupportedDestination(_))
        ));
    }

    #[test]
    fn test_mssql_connection_string_is_parsed_eagerly() {
        let adapter = Adapter::sql(
            DataFormat::MsSql,
            concat!(
                "Server=tcp:localhost,1433;Database=app;User Id=sa;",
                "Password=secret;TrustServerCertificate=true"
            ),
        )
        .unwrap();

        assert_eq!(adapter.format(), DataFormat::MsSql);
        assert!(adapter.destination().is_ok());
    }
}
