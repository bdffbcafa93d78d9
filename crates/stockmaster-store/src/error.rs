//! Error types for the local mirror.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable store failures.
///
/// Note that *reads* of missing or corrupt documents are not errors: they
/// degrade to the empty default so a half-written cache can never lock the
/// user out of their data. Only writes and directory resolution can fail.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be serialized.
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No platform data directory could be resolved.
    #[error("no usable data directory on this platform")]
    DataDirUnavailable,
}
