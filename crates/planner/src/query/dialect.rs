//! Defines the `Dialect` trait for database-specific SQL syntax.

use model::core::value::Value;

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - SQL Server uses brackets: `[my_column]`
    /// - PostgreSQL uses double quotes: `"my_column"`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    ///
    /// - SQL Server uses `@P1`, `@P2`, etc.
    /// - PostgreSQL uses `$1`, `$2`, etc.
    fn get_placeholder(&self, index: usize) -> String;

    /// Renders raw bytes as a literal the dialect accepts without quoting rules.
    fn binary_literal(&self, bytes: &[u8]) -> String;

    /// Renders a value as an inline SQL literal.
    ///
    /// `Null` becomes the bare `null` keyword, bytes use the dialect's binary
    /// literal, everything else is single-quoted text with embedded quotes doubled.
    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bytes(bytes) => self.binary_literal(bytes),
            other => quote_string(&other.as_text().unwrap_or_default()),
        }
    }

    /// Trailing clause that skips `offset` rows and takes the next `limit`.
    fn pagination_clause(&self, offset: usize, limit: usize) -> String;

    /// Directive that lets explicit values be written into an identity column.
    fn identity_insert(&self, table: &str) -> Option<String>;

    /// Maximum number of bound parameters a single request may carry.
    fn max_params(&self) -> usize;

    /// Maximum number of row constructors in a single `VALUES` list.
    fn max_rows_per_insert(&self) -> usize;

    /// Returns the name of the dialect (e.g., "SQL Server", "PostgreSQL").
    fn name(&self) -> String;
}

/// Wraps text in single quotes, doubling any embedded single quote.
pub fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[derive(Debug, Clone, Default)]
pub struct MsSql;

impl Dialect for MsSql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("@P{}", index + 1)
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
        format!("0x{hex}")
    }

    fn pagination_clause(&self, offset: usize, limit: usize) -> String {
        format!("offset {offset} rows fetch next {limit} rows only")
    }

    fn identity_insert(&self, table: &str) -> Option<String> {
        Some(format!("SET IDENTITY_INSERT {table} ON;"))
    }

    fn max_params(&self) -> usize {
        // TDS rejects requests with more than 2100 parameters
        2100
    }

    fn max_rows_per_insert(&self) -> usize {
        1000
    }

    fn name(&self) -> String {
        "SQL Server".into()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', "\"\""))
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("'\\x{hex}'")
    }

    fn pagination_clause(&self, offset: usize, limit: usize) -> String {
        format!("offset {offset} limit {limit}")
    }

    fn identity_insert(&self, _table: &str) -> Option<String> {
        None
    }

    fn max_params(&self) -> usize {
        u16::MAX as usize
    }

    fn max_rows_per_insert(&self) -> usize {
        usize::MAX
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mssql_literals() {
        let d = MsSql;
        assert_eq!(d.render_literal(&Value::Null), "null");
        assert_eq!(
            d.render_literal(&Value::String("O'Brien".into())),
            "'O''Brien'"
        );
        assert_eq!(d.render_literal(&Value::Int(5)), "'5'");
        assert_eq!(d.render_literal(&Value::Bytes(vec![0xca, 0xfe])), "0xCAFE");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(MsSql.quote_identifier("Id"), "[Id]");
        assert_eq!(MsSql.quote_identifier("a]b"), "[a]]b]");
        assert_eq!(Postgres.quote_identifier("Id"), r#""Id""#);
    }

    #[test]
    fn test_identity_insert() {
        assert_eq!(
            MsSql.identity_insert("Users").as_deref(),
            Some("SET IDENTITY_INSERT Users ON;")
        );
        assert_eq!(Postgres.identity_insert("Users"), None);
    }
}
