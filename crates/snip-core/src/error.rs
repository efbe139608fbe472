use thiserror::Error;

/// Errors surfaced by cache backends.
///
/// These never cross the cache boundary: orchestration goes through
/// [`UrlCache::get_or_miss`](crate::UrlCache::get_or_miss) and
/// [`UrlCache::set_or_warn`](crate::UrlCache::set_or_warn), which log and
/// swallow them.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by record store backends.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A different URL already owns this short code.
    #[error("short code already taken: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned to callers of [`Shortener`](crate::Shortener).
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    /// Two distinct URLs truncated to the same code. Not retried.
    #[error("short code collision: {0}")]
    CodeCollision(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::CodeCollision(code),
            other => Self::Storage(other.to_string()),
        }
    }
}
