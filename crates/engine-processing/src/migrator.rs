use crate::{
    fetcher::{FetchOutcome, RowFetcher},
    sink::dual::{DualSink, SinkReport},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Ticks (100 ns) between 0001-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Converts a UTC instant into 100 ns ticks since 0001-01-01T00:00:00Z,
/// the format used in replay file names.
pub fn dotnet_ticks(at: DateTime<Utc>) -> i64 {
    let sub_second = (at.timestamp_subsec_nanos() / 100) as i64;
    UNIX_EPOCH_TICKS + at.timestamp() * TICKS_PER_SECOND + sub_second
}

/// `<dir>/<table>-<ticks>.sql`
pub fn replay_file_path(dir: &Path, table: &str, ticks: i64) -> PathBuf {
    dir.join(format!("{table}-{ticks}.sql"))
}

/// Why a table's loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TableOutcome {
    /// A fetch returned no rows.
    Exhausted,
    /// Single-pass mode stopped after the first batch.
    SinglePass,
    /// Cancellation was observed before a fetch.
    Cancelled,
    /// A fetch failed. Handled like exhaustion: the table ends here.
    SourceFailed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: String,
    pub file: PathBuf,
    pub batches: usize,
    pub rows_fetched: usize,
    pub file_lines: usize,
    pub destination_rows: usize,
    pub file_failures: usize,
    pub destination_failures: usize,
    pub outcome: TableOutcome,
}

impl TableReport {
    fn new(state: &MigrationState) -> Self {
        TableReport {
            table: state.table.clone(),
            file: state.file.clone(),
            batches: 0,
            rows_fetched: 0,
            file_lines: 0,
            destination_rows: 0,
            file_failures: 0,
            destination_failures: 0,
            outcome: TableOutcome::Exhausted,
        }
    }

    fn record(&mut self, rows: usize, sink: &SinkReport) {
        self.batches += 1;
        self.rows_fetched += rows;
        self.file_lines += sink.file.rows();
        self.destination_rows += sink.destination.rows();
        if sink.file.is_failed() {
            self.file_failures += 1;
        }
        if sink.destination.is_failed() {
            self.destination_failures += 1;
        }
    }

    /// True when every fetched row reached both the file and the destination.
    pub fn is_complete(&self) -> bool {
        matches!(
            self.outcome,
            TableOutcome::Exhausted | TableOutcome::SinglePass
        ) && self.file_lines == self.rows_fetched
            && self.destination_rows == self.rows_fetched
    }
}

/// Per-table loop state, dropped when the table's loop ends.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationState {
    pub table: String,
    pub offset: usize,
    pub file: PathBuf,
}

impl MigrationState {
    pub fn new(table: &str, file: PathBuf) -> Self {
        MigrationState {
            table: table.to_string(),
            offset: 0,
            file,
        }
    }

    /// Moves to the next page. The step is always the page size, whatever
    /// the previous page returned.
    pub fn advance(&mut self, page_size: usize) {
        self.offset += page_size;
    }
}

/// Copies one table page by page: fetch, write to both sinks, advance.
pub struct TableMigrator {
    fetcher: RowFetcher,
    sink: DualSink,
    page_size: usize,
    single_pass: bool,
}

impl TableMigrator {
    pub fn new(fetcher: RowFetcher, sink: DualSink, page_size: usize, single_pass: bool) -> Self {
        TableMigrator {
            fetcher,
            sink,
            page_size,
            single_pass,
        }
    }

    pub async fn migrate(
        &self,
        table: &str,
        file: PathBuf,
        cancel: &CancellationToken,
    ) -> TableReport {
        info!("=== Processing table [{table}].. ===");

        let mut state = MigrationState::new(table, file);
        let mut report = TableReport::new(&state);

        report.outcome = loop {
            if cancel.is_cancelled() {
                info!(table, offset = state.offset, "Cancellation requested, stopping table");
                break TableOutcome::Cancelled;
            }

            let batch = match self.fetcher.fetch(table, self.page_size, state.offset).await {
                FetchOutcome::Rows(batch) => batch,
                FetchOutcome::Exhausted => break TableOutcome::Exhausted,
                FetchOutcome::Failed(err) => {
                    warn!(table, offset = state.offset, "Fetch failed, ending table early");
                    break TableOutcome::SourceFailed(err.to_string());
                }
            };

            let sink_report = self.sink.write(&batch, &state.file, cancel).await;
            report.record(batch.len(), &sink_report);

            if self.single_pass {
                break TableOutcome::SinglePass;
            }
            state.advance(self.page_size);
        };

        info!(
            table,
            batches = report.batches,
            rows = report.rows_fetched,
            outcome = ?report.outcome,
            "Table finished"
        );
        report
    }
}
