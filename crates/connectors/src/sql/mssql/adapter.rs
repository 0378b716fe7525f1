use crate::sql::{
    base::{
        destination::DbDataDestination,
        error::{ConnectorError, DbError},
        requests::FetchRowsRequest,
        source::DbDataSource,
    },
    mssql::{
        row::to_row_data,
        transaction::{self, BoundStatement},
    },
};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::{
    ast::{insert::Insert, select::PagedSelect},
    dialect::{self, Dialect},
    renderer::{Render, Renderer},
};
use tiberius::{Client, Config, error::Error as TdsError};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, warn};

pub type MsSqlClient = Client<Compat<TcpStream>>;

/// SQL Server adapter. Holds only the parsed connection settings; every
/// operation opens its own connection and closes it when done.
#[derive(Clone)]
pub struct MsSqlAdapter {
    config: Config,
    dialect: dialect::MsSql,
}

impl MsSqlAdapter {
    /// Parses an ADO.NET style connection string, e.g.
    /// `Server=tcp:localhost,1433;Database=app;User Id=sa;Password=...`.
    pub fn new(conn_str: &str) -> Result<Self, ConnectorError> {
        let config = Config::from_ado_string(conn_str)
            .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        Ok(MsSqlAdapter {
            config,
            dialect: dialect::MsSql,
        })
    }

    pub async fn connect(&self) -> Result<MsSqlClient, ConnectorError> {
        let tcp = TcpStream::connect(self.config.get_addr()).await?;
        tcp.set_nodelay(true)?;

        match Client::connect(self.config.clone(), tcp.compat_write()).await {
            Ok(client) => Ok(client),
            // Azure SQL gateways answer the login with a redirect
            Err(TdsError::Routing { host, port }) => {
                debug!(%host, port, "SQL Server login redirected");
                let mut config = self.config.clone();
                config.host(&host);
                config.port(port);

                let tcp = TcpStream::connect(config.get_addr()).await?;
                tcp.set_nodelay(true)?;
                Ok(Client::connect(config, tcp.compat_write()).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Round trip `SELECT 1` to verify reachability and credentials.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut client = self.connect().await?;
        let row = client.simple_query("SELECT 1").await?.into_row().await?;
        let value = row.and_then(|r| r.try_get::<i32, _>(0).ok().flatten());
        close(client).await;

        match value {
            Some(1) => Ok(()),
            other => Err(DbError::Unknown(format!(
                "SELECT 1 returned unexpected result: {other:?}"
            ))),
        }
    }
}

async fn close(client: MsSqlClient) {
    if let Err(err) = client.close().await {
        warn!(%err, "Failed to close SQL Server connection cleanly");
    }
}

#[async_trait]
impl DbDataSource for MsSqlAdapter {
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
        debug!(%sql, "Fetching rows from SQL Server");

        let mut client = self.connect().await?;
        let rows = client.simple_query(sql).await?.into_first_result().await?;
        close(client).await;

        Ok(rows
            .iter()
            .map(|row| to_row_data(&request.table, row))
            .collect())
    }
}

#[async_trait]
impl DbDataDestination for MsSqlAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn execute_script(&self, sql: &str) -> Result<(), DbError> {
        let mut client = self.connect().await?;
        client.simple_query(sql).await?.into_results().await?;
        close(client).await;
        Ok(())
    }

    async fn write_batch(
        &self,
        table: &str,
        rows: &[RowData],
        identity_insert: bool,
    ) -> Result<u64, DbError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let statements = insert_statements(&self.dialect, table, rows, identity_insert);
        let mut client = self.connect().await?;
        let result = transaction::write_all(&mut client, statements).await;
        close(client).await;
        result
    }
}

/// Renders `rows` as parameter-bounded inserts. SET IDENTITY_INSERT is
/// scoped to the request it runs in, so every chunk carries its own
/// directive.
fn insert_statements(
    dialect: &dyn Dialect,
    table: &str,
    rows: &[RowData],
    identity_insert: bool,
) -> Vec<BoundStatement> {
    let directive = identity_insert
        .then(|| dialect.identity_insert(table))
        .flatten();

    Insert::from_rows(table, rows)
        .split_for(dialect)
        .into_iter()
        .map(|chunk| {
            let mut renderer = Renderer::new(dialect);
            chunk.render(&mut renderer);
            let (insert_sql, params) = renderer.finish();

            let sql = match &directive {
                Some(directive) => format!("{directive}\n{insert_sql}"),
                None => insert_sql,
            };
            BoundStatement { sql, params }
        })
        .collect()
}
