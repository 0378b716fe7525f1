//! In-memory source and destination used by the table loop tests and by
//! downstream crates through the `testing` feature.

use async_trait::async_trait;
use connectors::sql::base::{
    destination::DbDataDestination, error::DbError, requests::FetchRowsRequest,
    source::DbDataSource,
};
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use planner::query::dialect::{Dialect, MsSql};
use std::{
    collections::HashMap,
    ops::RangeInclusive,
    sync::{Mutex, MutexGuard},
};
use tokio_util::sync::CancellationToken;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Rows `Id`, `Name` for the given id range, `Name` = `user-<id>`.
pub fn users(ids: RangeInclusive<i64>) -> Vec<RowData> {
    ids.map(|id| {
        RowData::new(
            "Users",
            vec![
                FieldValue::new("Id", Value::Int(id)),
                FieldValue::new("Name", Value::String(format!("user-{id}"))),
            ],
        )
    })
    .collect()
}

/// Source backed by per-table row vectors, paged by offset/limit.
#[derive(Default)]
pub struct MemorySource {
    tables: HashMap<String, Vec<RowData>>,
    requests: Mutex<Vec<FetchRowsRequest>>,
    fail_at: Option<(String, usize)>,
    cancel_after_fetch: Option<(String, CancellationToken)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, rows: Vec<RowData>) -> Self {
        self.tables.insert(table.to_string(), rows);
        self
    }

    /// Fails the fetch of `table` at `offset`.
    pub fn fail_at(mut self, table: &str, offset: usize) -> Self {
        self.fail_at = Some((table.to_string(), offset));
        self
    }

    /// Cancels `token` while the first fetch of `table` is in flight.
    pub fn cancel_during(mut self, table: &str, token: CancellationToken) -> Self {
        self.cancel_after_fetch = Some((table.to_string(), token));
        self
    }

    pub fn requests(&self) -> Vec<FetchRowsRequest> {
        lock(&self.requests).clone()
    }

    pub fn offsets(&self, table: &str) -> Vec<usize> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.table == table)
            .map(|r| r.offset)
            .collect()
    }
}

#[async_trait]
impl DbDataSource for MemorySource {
    async fn fetch_rows(&self, request: FetchRowsRequest) -> Result<Vec<RowData>, DbError> {
        lock(&self.requests).push(request.clone());

        if let Some((table, token)) = &self.cancel_after_fetch
            && *table == request.table
        {
            token.cancel();
        }

        if let Some((table, offset)) = &self.fail_at
            && *table == request.table
            && *offset == request.offset
        {
            return Err(DbError::Unknown(format!(
                "injected fetch failure for {table} at {offset}"
            )));
        }

        let rows = self
            .tables
            .get(&request.table)
            .map(|rows| {
                rows.iter()
                    .skip(request.offset)
                    .take(request.limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }
}

/// One `write_batch` call as seen by [`MemoryDestination`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    pub table: String,
    pub identity_insert: bool,
    pub ids: Vec<i64>,
}

/// Destination that records what it was asked to write. Speaks the
/// SQL Server dialect.
#[derive(Default)]
pub struct MemoryDestination {
    batches: Mutex<Vec<RecordedBatch>>,
    scripts: Mutex<Vec<String>>,
    fail: bool,
    dialect: MsSql,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        lock(&self.batches).clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        lock(&self.scripts).clone()
    }
}

#[async_trait]
impl DbDataDestination for MemoryDestination {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn execute_script(&self, sql: &str) -> Result<(), DbError> {
        if self.fail {
            return Err(DbError::Write("injected script failure".into()));
        }
        lock(&self.scripts).push(sql.to_string());
        Ok(())
    }

    async fn write_batch(
        &self,
        table: &str,
        rows: &[RowData],
        identity_insert: bool,
    ) -> Result<u64, DbError> {
        if self.fail {
            return Err(DbError::Write("injected batch failure".into()));
        }
        lock(&self.batches).push(RecordedBatch {
            table: table.to_string(),
            identity_insert,
            ids: rows.iter().filter_map(|r| r.id().as_i64()).collect(),
        });
        Ok(rows.len() as u64)
    }
}
