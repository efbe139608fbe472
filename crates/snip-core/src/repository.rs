use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL mapping.
///
/// Created exactly once per distinct URL and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    /// The original URL that was shortened. Unique across all records.
    pub url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
}

/// Outcome of [`Repository::insert_or_ignore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new record was written.
    Created,
    /// A record for this URL was already present; nothing was written.
    AlreadyExists,
}

impl Insertion {
    pub fn is_created(self) -> bool {
        matches!(self, Insertion::Created)
    }

    /// Interprets the affected-row count of an insert-or-ignore statement.
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            Insertion::AlreadyExists
        } else {
            Insertion::Created
        }
    }
}

/// Durable URL ↔ short code storage.
///
/// Implementations must enforce URL uniqueness themselves; callers race
/// check-then-insert and rely on [`insert_or_ignore`](Repository::insert_or_ignore)
/// being the sole arbiter.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Ensures the record table and its unique constraints exist. Idempotent.
    async fn create_schema(&self) -> Result<()>;

    /// Checks whether a record for this exact URL exists.
    async fn exists(&self, url: &str) -> Result<bool>;

    /// Inserts a new record unless one with the same URL already exists.
    ///
    /// Returns `Err(StorageError::Conflict)` if the code already belongs to
    /// a different URL.
    async fn insert_or_ignore(&self, url: &str, code: &ShortCode) -> Result<Insertion>;

    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Record>>;

    /// Retrieves the record for a given URL.
    /// Returns `None` if the URL was never shortened.
    async fn find_by_url(&self, url: &str) -> Result<Option<Record>>;
}
