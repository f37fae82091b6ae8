//! Storage layer errors

use thiserror::Error;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Document patch must be a JSON object")]
    InvalidPatch,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
