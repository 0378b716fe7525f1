use crate::error::CliError;
use connectors::adapter::{Adapter, DataFormat};
use std::str::FromStr;
use tracing::{error, info};

const SENSITIVE_KEYS: &[&str] = &["password", "pwd", "secret", "token", "key"];

/// Opens a connection for `format` and runs `SELECT 1`.
pub async fn test_connection(format: &str, conn_str: &str) -> Result<(), CliError> {
    let format = DataFormat::from_str(format)
        .map_err(|_| CliError::InvalidConnectionFormat(format.to_string()))?;
    let shown = redact(conn_str);

    info!("Pinging {format} at '{shown}'");

    let adapter = Adapter::sql(format, conn_str).inspect_err(|e| {
        error!("{format} connection string parse failed: {e}");
    })?;

    adapter.ping().await.inspect_err(|e| {
        error!("{format} ping to '{shown}' failed: {e}");
    })?;

    info!("{format} ping to '{shown}' succeeded");
    Ok(())
}

/// Masks the values of credential-like keys in `key=value` connection
/// strings (`;` or whitespace separated).
pub fn redact(conn_str: &str) -> String {
    let separator = if conn_str.contains(';') { ';' } else { ' ' };

    conn_str
        .split(separator)
        .map(|part| match part.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{key}=****"),
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

fn is_sensitive(key: &str) -> bool {
    let key = key.trim().to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|s| key.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_ado_string() {
        assert_eq!(
            redact("Server=tcp:db,1433;User Id=sa;Password=hunter2;"),
            "Server=tcp:db,1433;User Id=sa;Password=****;"
        );
    }

    #[test]
    fn test_redact_libpq_string() {
        assert_eq!(
            redact("host=localhost user=app password=hunter2 dbname=legacy"),
            "host=localhost user=app password=**** dbname=legacy"
        );
    }

    #[tokio::test]
    async fn test_unknown_format_is_rejected() {
        assert!(matches!(
            test_connection("oracle", "whatever").await,
            Err(CliError::InvalidConnectionFormat(_))
        ));
    }
}
