pub mod destination;
pub mod dual;
pub mod file;

use serde::Serialize;

/// What happened to one batch at one sink. No variant changes the
/// control flow of the table loop; failures are logged where they occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SinkStatus {
    /// Every row of the batch was handed to the sink.
    Written(usize),
    /// Cancellation stopped the sink after this many rows.
    Interrupted(usize),
    /// The sink failed; rows already written stay written.
    Failed(String),
}

impl SinkStatus {
    pub fn rows(&self) -> usize {
        match self {
            SinkStatus::Written(n) | SinkStatus::Interrupted(n) => *n,
            SinkStatus::Failed(_) => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SinkStatus::Failed(_))
    }
}
