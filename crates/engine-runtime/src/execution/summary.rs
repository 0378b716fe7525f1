use chrono::{DateTime, Utc};
use engine_processing::migrator::{TableOutcome, TableReport};
use serde::Serialize;

/// What a run did, table by table. Informational only: a run with failed
/// batches or truncated tables still returns a summary, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    /// Run start in 100 ns ticks, as used in replay file names.
    pub ticks: i64,
    pub single_pass: bool,
    pub tables: Vec<TableReport>,
    /// Tables never started because cancellation came first.
    pub skipped: Vec<String>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, ticks: i64, single_pass: bool) -> Self {
        RunSummary {
            started_at,
            ticks,
            single_pass,
            tables: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn rows_fetched(&self) -> usize {
        self.tables.iter().map(|t| t.rows_fetched).sum()
    }

    pub fn destination_rows(&self) -> usize {
        self.tables.iter().map(|t| t.destination_rows).sum()
    }

    pub fn was_cancelled(&self) -> bool {
        !self.skipped.is_empty()
            || self
                .tables
                .iter()
                .any(|t| t.outcome == TableOutcome::Cancelled)
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.tables.iter().all(TableReport::is_complete)
    }
}
