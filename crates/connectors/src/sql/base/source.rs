use crate::sql::base::{error::DbError, requests::FetchRowsRequest};
use async_trait::async_trait;
use model::records::row::RowData;

#[async_trait]
pub trait DbDataSource: Send + Sync {
    /// Reads one page: rows sorted ascending by the request's order column,
    /// `offset` rows skipped, at most `limit` rows returned, all columns.
    async fn fetch_rows(&self, request: FetchRowsRequest) -> Result<Vec<RowData>, DbError>;
}
