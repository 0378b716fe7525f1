use model::records::row::ID_COLUMN;

/// One ordered page read against a source table.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRowsRequest {
    pub table: String,
    pub order_by: String,
    pub offset: usize,
    pub limit: usize,
}

impl FetchRowsRequest {
    /// Page ordered by the `Id` column.
    pub fn page(table: &str, offset: usize, limit: usize) -> Self {
        FetchRowsRequest {
            table: table.to_string(),
            order_by: ID_COLUMN.to_string(),
            offset,
            limit,
        }
    }
}
