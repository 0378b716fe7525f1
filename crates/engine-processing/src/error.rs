use connectors::sql::base::error::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to write replay file '{path}': {source}")]
    ReplayFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write batch to destination for table '{table}': {source}")]
    WriteBatch {
        table: String,
        #[source]
        source: DbError,
    },

    #[error("Fetch failed for table '{table}' at offset {offset}: {source}")]
    Fetch {
        table: String,
        offset: usize,
        #[source]
        source: DbError,
    },
}
