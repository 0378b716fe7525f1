use crate::{error::ProcessingError, sink::SinkStatus, statement::StatementGenerator};
use connectors::sql::base::destination::DbDataDestination;
use model::records::batch::Batch;
use planner::query::dialect::Dialect;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use tracing::{error, info};

/// How a batch reaches the destination store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Multi-row inserts with bound values.
    #[default]
    Parameterized,
    /// The identity directive plus every rendered statement, executed as
    /// one multi-statement request.
    Script,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parameterized" | "params" => Ok(WriteMode::Parameterized),
            "script" => Ok(WriteMode::Script),
            other => Err(format!("Unknown write mode: {other}")),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Parameterized => write!(f, "parameterized"),
            WriteMode::Script => write!(f, "script"),
        }
    }
}

#[derive(Clone)]
pub struct DestinationSink {
    destination: Arc<dyn DbDataDestination>,
    mode: WriteMode,
}

impl DestinationSink {
    pub fn new(destination: Arc<dyn DbDataDestination>, mode: WriteMode) -> Self {
        Self { destination, mode }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.destination.dialect()
    }

    /// Writes the whole batch in one go. `statements` are the rendered
    /// inserts for the batch, used only in script mode.
    pub async fn write(&self, batch: &Batch, statements: &[String]) -> SinkStatus {
        info!(table = %batch.table, mode = %self.mode, "Importing {} rows of data..", batch.len());

        let result = match self.mode {
            WriteMode::Parameterized => self
                .destination
                .write_batch(&batch.table, &batch.rows, true)
                .await
                .map(|_| batch.len()),
            WriteMode::Script => {
                let generator = StatementGenerator::new(self.dialect());
                let script = generator.render_script(&batch.table, statements);
                self.destination
                    .execute_script(&script)
                    .await
                    .map(|_| batch.len())
            }
        };

        match result {
            Ok(written) => {
                info!(table = %batch.table, rows = written, "Import done.");
                SinkStatus::Written(written)
            }
            Err(source) => {
                let err = ProcessingError::WriteBatch {
                    table: batch.table.clone(),
                    source,
                };
                error!(%err, offset = batch.offset, "Destination write failed, batch dropped");
                SinkStatus::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryDestination, users};

    #[tokio::test]
    async fn test_parameterized_mode_writes_rows() {
        let destination = Arc::new(MemoryDestination::new());
        let sink = DestinationSink::new(destination.clone(), WriteMode::Parameterized);
        let batch = Batch::new("Users", 0, users(1..=3));

        let status = sink.write(&batch, &[]).await;

        assert_eq!(status, SinkStatus::Written(3));
        let batches = destination.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].table, "Users");
        assert!(batches[0].identity_insert);
        assert_eq!(batches[0].ids, vec![1, 2, 3]);
        assert!(destination.scripts().is_empty());
    }

    #[tokio::test]
    async fn test_script_mode_prefixes_directive_once_per_batch() {
        let destination = Arc::new(MemoryDestination::new());
        let sink = DestinationSink::new(destination.clone(), WriteMode::Script);
        let batch = Batch::new("Users", 0, users(1..=2));
        let statements = StatementGenerator::new(destination.dialect())
            .render_all(&batch.table, &batch.rows);

        let status = sink.write(&batch, &statements).await;

        assert_eq!(status, SinkStatus::Written(2));
        let scripts = destination.scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].matches("SET IDENTITY_INSERT").count(), 1);
        assert_eq!(scripts[0].lines().count(), 3);
    }

    #[tokio::test]
    async fn test_failure_is_reported_as_status() {
        let destination = Arc::new(MemoryDestination::new().fail_writes());
        let sink = DestinationSink::new(destination.clone(), WriteMode::Parameterized);
        let batch = Batch::new("Users", 0, users(1..=2));

        let status = sink.write(&batch, &[]).await;

        assert!(status.is_failed());
        assert!(destination.batches().is_empty());
    }

    #[test]
    fn test_write_mode_parsing() {
        assert_eq!("script".parse::<WriteMode>(), Ok(WriteMode::Script));
        assert_eq!(
            "Parameterized".parse::<WriteMode>(),
            Ok(WriteMode::Parameterized)
        );
        assert!("bulk".parse::<WriteMode>().is_err());
        assert_eq!(WriteMode::default(), WriteMode::Parameterized);
    }
}
