//! Errors surfaced to callers of the quote book

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by quote operations
#[derive(Debug, Error)]
pub enum QuoteError {
    /// A required field was empty or missing
    #[error("validation failed: {0}")]
    Validation(String),

    /// An imported payload was unusable
    #[error("invalid import: {0}")]
    ImportFormat(String),

    /// The remote feed could not be fetched or decoded
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A storage scope failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type QuoteResult<T> = Result<T, QuoteError>;
