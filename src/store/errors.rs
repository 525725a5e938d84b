//! Record store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted snapshot exists but cannot be decoded.
    ///
    /// Fatal at startup; the store never tries to repair it.
    #[error("Corrupt snapshot at {path}: {reason}")]
    CorruptSnapshot { path: String, reason: String },

    /// Reading or writing the snapshot failed
    #[error("Snapshot I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// In-memory state could not be encoded
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the process must stop instead of serving
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::CorruptSnapshot { .. })
    }
}
