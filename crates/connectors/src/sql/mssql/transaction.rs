use crate::sql::{
    base::error::DbError,
    mssql::{adapter::MsSqlClient, params::MsSqlParamStore},
};
use async_trait::async_trait;
use model::core::value::Value;
use tiberius::ToSql;
use tracing::warn;

/// One rendered statement and the values bound to its `@Pn` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The two request kinds a write needs from an open TDS session.
#[async_trait]
pub trait TdsSession: Send {
    async fn simple(&mut self, sql: &str) -> Result<(), DbError>;

    async fn execute_bound(&mut self, statement: BoundStatement) -> Result<u64, DbError>;
}

#[async_trait]
impl TdsSession for MsSqlClient {
    async fn simple(&mut self, sql: &str) -> Result<(), DbError> {
        self.simple_query(sql).await?.into_results().await?;
        Ok(())
    }

    async fn execute_bound(&mut self, statement: BoundStatement) -> Result<u64, DbError> {
        let bindings = MsSqlParamStore::from_values(statement.params);
        let refs: Vec<&dyn ToSql> = bindings.as_refs();
        let result = self.execute(statement.sql, &refs).await?;
        Ok(result.total())
    }
}

pub struct Transaction<'a, S: TdsSession> {
    session: &'a mut S,
}

impl<'a, S: TdsSession> Transaction<'a, S> {
    pub async fn begin(session: &'a mut S) -> Result<Self, DbError> {
        session.simple("BEGIN TRAN").await?;
        Ok(Transaction { session })
    }

    pub async fn execute(&mut self, statement: BoundStatement) -> Result<u64, DbError> {
        self.session.execute_bound(statement).await
    }

    pub async fn commit(self) -> Result<(), DbError> {
        self.session.simple("COMMIT TRAN").await
    }

    /// A failed statement may already have aborted the transaction
    /// server-side, hence the `@@TRANCOUNT` guard.
    pub async fn rollback(self) -> Result<(), DbError> {
        self.session
            .simple("IF @@TRANCOUNT > 0 ROLLBACK TRAN")
            .await
    }
}

/// Runs every statement inside a single transaction and returns the total
/// row count. Either all statements commit or none do; the first failure
/// rolls back and is returned as is.
pub async fn write_all<S: TdsSession>(
    session: &mut S,
    statements: Vec<BoundStatement>,
) -> Result<u64, DbError> {
    let mut tx = Transaction::begin(session).await?;
    let mut affected = 0;

    for statement in statements {
        match tx.execute(statement).await {
            Ok(count) => affected += count,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(%rollback_err, "Rollback after failed insert did not complete");
                }
                return Err(err);
            }
        }
    }

    tx.commit().await?;
    Ok(affected)
}
