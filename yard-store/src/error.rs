/// Error types for the record store
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file exists but could not be read (permissions, medium failure)
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the store failed; nothing was committed
    #[error("failed to persist store {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be encoded
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record index {index} out of range (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Type alias for Results using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
