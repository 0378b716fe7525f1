//! Defines the AST for an INSERT statement.

use crate::query::dialect::Dialect;
use model::{core::value::Value, records::row::RowData};

/// Represents a complete INSERT statement.
///
/// Supports both single-row and multi-row (batch) inserts through the
/// `values` field, which is a list of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    /// Target table, rendered verbatim so schema-qualified names pass through.
    pub table: String,
    pub columns: Vec<String>,
    /// Each inner vector represents a single row.
    pub values: Vec<Vec<Value>>,
}

impl Insert {
    pub fn from_row(table: &str, row: &RowData) -> Self {
        Insert {
            table: table.to_string(),
            columns: row.columns().map(str::to_string).collect(),
            values: vec![row.values().cloned().collect()],
        }
    }

    /// Builds one multi-row insert. Every row must share the column layout
    /// of the first one, which holds for rows produced by a single query.
    pub fn from_rows(table: &str, rows: &[RowData]) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();

        Insert {
            table: table.to_string(),
            columns,
            values: rows.iter().map(|r| r.values().cloned().collect()).collect(),
        }
    }

    /// Splits the insert so each part respects the dialect's parameter and
    /// row-constructor limits. Row order is preserved across the parts.
    pub fn split_for(self, dialect: &dyn Dialect) -> Vec<Insert> {
        let width = self.columns.len().max(1);
        let by_params = (dialect.max_params() / width).max(1);
        let rows_per_chunk = by_params.min(dialect.max_rows_per_insert()).max(1);

        if self.values.len() <= rows_per_chunk {
            return vec![self];
        }

        let Insert {
            table,
            columns,
            values,
        } = self;

        values
            .chunks(rows_per_chunk)
            .map(|chunk| Insert {
                table: table.clone(),
                columns: columns.clone(),
                values: chunk.to_vec(),
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dialect::MsSql;
    use model::records::row::FieldValue;

    fn row(id: i64) -> RowData {
        RowData::new(
            "t",
            vec![
                FieldValue::new("Id", Value::Int(id)),
                FieldValue::new("Name", Value::String(format!("n{id}"))),
            ],
        )
    }

    #[test]
    fn test_split_respects_param_limit() {
        // 2 columns -> 1050 rows per request by params, capped at 1000 rows
        let rows: Vec<RowData> = (1..=2500).map(row).collect();
        let parts = Insert::from_rows("t", &rows).split_for(&MsSql);

        assert_eq!(
            parts.iter().map(Insert::row_count).collect::<Vec<_>>(),
            vec![1000, 1000, 500]
        );
        assert_eq!(parts[1].values[0][0], Value::Int(1001));
    }

    #[test]
    fn test_small_insert_is_not_split() {
        let rows: Vec<RowData> = (1..=3).map(row).collect();
        let parts = Insert::from_rows("t", &rows).split_for(&MsSql);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].columns, vec!["Id", "Name"]);
    }
}
