use crate::{error::ProcessingError, sink::SinkStatus};
use std::path::Path;
use tokio::{
    fs::OpenOptions,
    io::{AsyncWriteExt, BufWriter},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Appends rendered statements to a table's replay file, one per line.
#[derive(Debug, Clone, Default)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        FileSink
    }

    /// Opens (or creates) `path` in append mode and writes one line per
    /// statement. Cancellation is checked before every line; lines already
    /// written are kept.
    pub async fn append(
        &self,
        path: &Path,
        statements: &[String],
        cancel: &CancellationToken,
    ) -> SinkStatus {
        match self.try_append(path, statements, cancel).await {
            Ok(status) => status,
            Err(source) => {
                let err = ProcessingError::ReplayFile {
                    path: path.display().to_string(),
                    source,
                };
                error!(%err, "Replay file write failed");
                SinkStatus::Failed(err.to_string())
            }
        }
    }

    async fn try_append(
        &self,
        path: &Path,
        statements: &[String],
        cancel: &CancellationToken,
    ) -> Result<SinkStatus, std::io::Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        let mut writer = BufWriter::new(file);
        let mut written = 0;

        for statement in statements {
            if cancel.is_cancelled() {
                writer.flush().await?;
                info!(
                    path = %path.display(),
                    written,
                    "Cancellation requested, replay file left incomplete for this batch"
                );
                return Ok(SinkStatus::Interrupted(written));
            }

            writer.write_all(statement.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            written += 1;
        }

        writer.flush().await?;
        Ok(SinkStatus::Written(written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn statements(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("insert into t ([Id]) values ('{i}');")).collect()
    }

    #[tokio::test]
    async fn test_append_accumulates_across_batches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t-1.sql");
        let sink = FileSink::new();
        let cancel = CancellationToken::new();

        assert_eq!(
            sink.append(&path, &statements(2), &cancel).await,
            SinkStatus::Written(2)
        );
        assert_eq!(
            sink.append(&path, &statements(1), &cancel).await,
            SinkStatus::Written(1)
        );

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec![
                "insert into t ([Id]) values ('1');",
                "insert into t ([Id]) values ('2');",
                "insert into t ([Id]) values ('1');",
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_sink_writes_nothing_more() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t-2.sql");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let status = FileSink::new().append(&path, &statements(3), &cancel).await;

        assert_eq!(status, SinkStatus::Interrupted(0));
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_path_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("t-3.sql");

        let status = FileSink::new()
            .append(&path, &statements(1), &CancellationToken::new())
            .await;

        assert!(status.is_failed());
    }
}
