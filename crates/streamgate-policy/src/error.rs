//! Error types for the policy crate.

use thiserror::Error;

/// Failures reported by a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A record with the same key already exists.
    #[error("{0} already exists")]
    Conflict(String),

    /// The backend itself failed (connection, lock, query).
    #[error("storage error: {0}")]
    Backend(String),
}
