use crate::{core::value::Value, records::row::RowData};

/// One page of rows returned by a single fetch.
#[derive(Debug, Clone)]
pub struct Batch {
    pub table: String,
    pub offset: usize,
    pub rows: Vec<RowData>,
}

impl Batch {
    pub fn new(table: &str, offset: usize, rows: Vec<RowData>) -> Self {
        Batch {
            table: table.to_string(),
            offset,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_id(&self) -> Option<Value> {
        self.rows.first().map(RowData::id)
    }

    pub fn last_id(&self) -> Option<Value> {
        self.rows.last().map(RowData::id)
    }
}
