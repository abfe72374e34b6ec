use crate::shortcode::ShortCode;
use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The short code is already taken by another mapping. The caller is
    /// expected to retry with a freshly generated code.
    #[error("short code already taken: {0}")]
    CodeConflict(ShortCode),
    /// The original URL is already mapped under `existing`. Carries the
    /// existing code so callers can treat the conflict as a dedup hit.
    #[error("original url already mapped to: {existing}")]
    OriginalUrlMapped { existing: ShortCode },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl From<ContextError> for StorageError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => StorageError::Cancelled,
            ContextError::DeadlineExceeded => StorageError::DeadlineExceeded,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    /// Every generation attempt collided with an existing code. Fatal for
    /// the request; logged at error level as an operational alert.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// Unexpected storage failure, tagged with the operation that hit it.
    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        source: StorageError,
    },
}

impl From<ContextError> for ShortenerError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => ShortenerError::Cancelled,
            ContextError::DeadlineExceeded => ShortenerError::DeadlineExceeded,
        }
    }
}
