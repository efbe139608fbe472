use async_trait::async_trait;
use snip_core::cache::{CacheKey, Result, UrlCache};
use std::time::Duration;

/// A cache implementation that stores nothing.
///
/// Used when caching is disabled: every lookup misses and every write
/// succeeds immediately, so all reads go to the record store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UrlCache for NullCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}
