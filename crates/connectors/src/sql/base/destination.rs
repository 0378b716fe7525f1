use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::dialect::Dialect;

#[async_trait]
pub trait DbDataDestination: Send + Sync {
    /// Dialect the destination speaks; replay statements are rendered with it.
    fn dialect(&self) -> &dyn Dialect;

    /// Executes a multi-statement script in a single round trip.
    async fn execute_script(&self, sql: &str) -> Result<(), DbError>;

    /// Inserts `rows` with bound parameters, keeping their order. Explicit
    /// identity values are allowed when `identity_insert` is set.
    /// Returns the number of rows the destination reported as affected.
    async fn write_batch(
        &self,
        table: &str,
        rows: &[RowData],
        identity_insert: bool,
    ) -> Result<u64, DbError>;
}
