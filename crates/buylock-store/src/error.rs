//! Store error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to perform a backend operation.
    #[error("Store operation failed on '{key}': {reason}")]
    Backend { key: String, reason: String },

    /// The backend's internal lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn backend(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}
