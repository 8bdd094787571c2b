//! Storage error types for flowrank-storage.

use std::path::PathBuf;

use flowrank_core::CoreError;
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data is not valid JSON, or could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The JSON is neither a record array nor an object with a `nodes` array.
    #[error("unsupported record set layout: {reason}")]
    Layout { reason: String },

    /// The records failed shape validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
