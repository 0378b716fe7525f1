use crate::{
    sink::{SinkStatus, destination::DestinationSink, file::FileSink},
    statement::StatementGenerator,
};
use model::records::batch::Batch;
use serde::Serialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Outcome of handing one batch to both sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkReport {
    pub file: SinkStatus,
    pub destination: SinkStatus,
}

/// Writes every batch twice: as inline-literal statements appended to the
/// replay file, then into the destination store. The two writes are
/// independent and both are always attempted.
#[derive(Clone)]
pub struct DualSink {
    file: FileSink,
    destination: DestinationSink,
}

impl DualSink {
    pub fn new(destination: DestinationSink) -> Self {
        Self {
            file: FileSink::new(),
            destination,
        }
    }

    pub async fn write(
        &self,
        batch: &Batch,
        path: &Path,
        cancel: &CancellationToken,
    ) -> SinkReport {
        let generator = StatementGenerator::new(self.destination.dialect());
        let statements = generator.render_all(&batch.table, &batch.rows);

        let file = self.file.append(path, &statements, cancel).await;
        let destination = self.destination.write(batch, &statements).await;

        SinkReport { file, destination }
    }
}
