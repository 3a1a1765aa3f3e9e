//! Ledger store error taxonomy.
//!
//! Three recoverable kinds (not-found, conflict, validation) that the HTTP
//! layer maps onto status codes, plus the two snapshot failures. A snapshot
//! failure is fatal: at startup nothing was loaded, and mid-operation the
//! in-memory state has already diverged from disk.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Ledger store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Referenced envelope id does not exist
    #[error("Envelope not found")]
    NotFound,

    /// Business-rule violation; the operation had no effect
    #[error("{0}")]
    Conflict(String),

    /// Malformed input caught by the store's own defenses
    #[error("{0}")]
    Validation(String),

    /// Durable snapshot unreadable or corrupt at startup
    #[error("Snapshot load failed: {0}")]
    SnapshotLoad(String),

    /// Snapshot write failed after the in-memory mutation applied
    #[error("Snapshot write failed: {0}")]
    SnapshotWrite(String),
}

impl StoreError {
    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a snapshot load error
    pub fn snapshot_load(message: impl Into<String>) -> Self {
        Self::SnapshotLoad(message.into())
    }

    /// Create a snapshot write error
    pub fn snapshot_write(message: impl Into<String>) -> Self {
        Self::SnapshotWrite(message.into())
    }

    /// HTTP status code the adapter layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound => 404,
            StoreError::Conflict(_) => 409,
            StoreError::Validation(_) => 422,
            StoreError::SnapshotLoad(_) => 500,
            StoreError::SnapshotWrite(_) => 500,
        }
    }

    /// Whether this error leaves the process in a state it cannot recover from
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::SnapshotLoad(_) | StoreError::SnapshotWrite(_)
        )
    }
}
