use crate::sql::{
    base::{
        error::{ConnectorError, DbError},
        requests::FetchRowsRequest,
        source::DbDataSource,
    },
    postgres::{
        row::to_row_data,
        utils::{connect_client, parse_config},
    },
};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::{
    ast::select::PagedSelect,
    dialect,
    renderer::{Render, Renderer},
};
use tokio_postgres::Config;
use tracing::debug;

/// PostgreSQL source adapter. Connects per operation; the connection task
/// ends when the client is dropped.
#[derive(Clone)]
pub struct PgAdapter {
    config: Config,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    pub fn new(url: &str) -> Result<Self, ConnectorError> {
        Ok(PgAdapter {
            config: parse_config(url)?,
            dialect: dialect::Postgres,
        })
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        let client = connect_client(&self.config).await?;
        let row = client.query_one("SELECT 1", &[]).await?;
        let value: i32 = row.try_get(0)?;

        if value != 1 {
            return Err(DbError::Unknown(format!(
                "SELECT 1 returned unexpected result: {value}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DbDataSource for PgAdapter {
    async fn fetch_rows(&self, request: FetchRowsRequest) -> Result<Vec<RowData>, DbError> {
        let ast = PagedSelect::new(
            &request.table,
            &request.order_by,
            request.offset,
            request.limit,
        );
        let mut renderer = Renderer::new(&self.dialect);
        ast.render(&mut renderer);
        let (sql, _) = renderer.finish();
        debug!(%sql, "Fetching rows from Postgres");

        let client = connect_client(&self.config).await?;
        let rows = client.query(&sql, &[]).await?;

        Ok(rows
            .iter()
            .map(|row| to_row_data(&request.table, row))
            .collect())
    }
}
