use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;
use snip_core::repository::{Insertion, Record, Repository, Result};
use snip_core::{ShortCode, StorageError};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Tables {
    records: Vec<Record>,
    by_url: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

/// In-memory implementation of the Repository trait.
///
/// Both unique indexes live behind a single lock so the URL and code
/// constraints are checked and updated together. The lock is never held
/// across an `.await`. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tables: RwLock::new(Tables {
                records: Vec::with_capacity(capacity),
                by_url: HashMap::with_capacity(capacity),
                by_code: HashMap::with_capacity(capacity),
            }),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.tables.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.tables.read().by_url.contains_key(url))
    }

    async fn insert_or_ignore(&self, url: &str, code: &ShortCode) -> Result<Insertion> {
        let mut tables = self.tables.write();

        if tables.by_url.contains_key(url) {
            return Ok(Insertion::AlreadyExists);
        }
        if tables.by_code.contains_key(code.as_str()) {
            return Err(StorageError::Conflict(code.to_string()));
        }

        let index = tables.records.len();
        let id = i64::try_from(index + 1)
            .map_err(|e| StorageError::Operation(format!("record id overflow: {e}")))?;

        tables.records.push(Record {
            id,
            url: url.to_owned(),
            short_code: code.clone(),
            created_at: Timestamp::now(),
        });
        tables.by_url.insert(url.to_owned(), index);
        tables.by_code.insert(code.as_str().to_owned(), index);

        Ok(Insertion::Created)
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Record>> {
        let tables = self.tables.read();
        Ok(tables
            .by_code
            .get(code.as_str())
            .map(|&index| tables.records[index].clone()))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Record>> {
        let tables = self.tables.read();
        Ok(tables
            .by_url
            .get(url)
            .map(|&index| tables.records[index].clone()))
    }
}
