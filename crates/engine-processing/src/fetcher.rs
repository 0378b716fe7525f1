use crate::error::ProcessingError;
use connectors::sql::base::{requests::FetchRowsRequest, source::DbDataSource};
use model::{core::value::Value, records::batch::Batch};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of one paginated read.
#[derive(Debug)]
pub enum FetchOutcome {
    /// At least one row came back.
    Rows(Batch),
    /// The page was empty: the table has no rows past this offset.
    Exhausted,
    /// The read failed. The failure is already logged.
    Failed(ProcessingError),
}

/// Issues one ordered page read per call against the source.
#[derive(Clone)]
pub struct RowFetcher {
    source: Arc<dyn DbDataSource>,
}

impl RowFetcher {
    pub fn new(source: Arc<dyn DbDataSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, table: &str, page_size: usize, offset: usize) -> FetchOutcome {
        info!(table, offset, "Fetching data with offset {offset} rows..");

        let request = FetchRowsRequest::page(table, offset, page_size);
        debug!(?request, "Fetch request");

        match self.source.fetch_rows(request).await {
            Ok(rows) if rows.is_empty() => {
                info!(table, offset, "No data fetched.");
                FetchOutcome::Exhausted
            }
            Ok(rows) => {
                let batch = Batch::new(table, offset, rows);
                let first = id_text(batch.first_id());
                let last = id_text(batch.last_id());
                info!(table, rows = batch.len(), "Fetched data with Id {first} - {last}");
                FetchOutcome::Rows(batch)
            }
            Err(source) => {
                let err = ProcessingError::Fetch {
                    table: table.to_string(),
                    offset,
                    source,
                };
                error!(%err, "Failed to fetch rows");
                FetchOutcome::Failed(err)
            }
        }
    }
}

fn id_text(id: Option<Value>) -> String {
    id.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}
