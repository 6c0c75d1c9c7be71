use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize stored values: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("invalid game result: {correct} correct out of {total}")]
    InvalidResult { correct: u32, total: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFactoryError {
    #[error("a question request is already in flight")]
    RequestInFlight,
}
