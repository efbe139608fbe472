use async_trait::async_trait;
use snip_core::cache::{CacheKey, Result, UrlCache};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A multi-layer cache that composes two cache implementations.
///
/// L1 is typically a fast, local cache (e.g., [`MokaUrlCache`](crate::MokaUrlCache))
/// and L2 a shared, distributed one (e.g., [`RedisUrlCache`](crate::RedisUrlCache)).
///
/// # Operation Strategy
///
/// - **Get**: Try L1 first, if miss try L2. An L2 hit is copied into L1 with
///   `backfill_ttl`, since the entry's remaining lifetime in L2 is unknown.
/// - **Set**: Write to L2, then L1. An unavailable L2 never keeps L1 empty.
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
    backfill_ttl: Duration,
}

impl<L1, L2> LayeredCache<L1, L2> {
    /// Creates a new layered cache with the given L1 and L2 caches.
    ///
    /// # Arguments
    ///
    /// * `l1` - The primary/faster cache
    /// * `l2` - The secondary/slower cache
    /// * `backfill_ttl` - Lifetime of entries copied from L2 into L1
    pub fn new(l1: L1, l2: L2, backfill_ttl: Duration) -> Self {
        Self {
            l1,
            l2,
            backfill_ttl,
        }
    }

    /// Returns a reference to the L1 cache.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns a reference to the L2 cache.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }
}

#[async_trait]
impl<L1, L2> UrlCache for LayeredCache<L1, L2>
where
    L1: UrlCache,
    L2: UrlCache,
{
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        match self.l1.get(key).await {
            Ok(Some(value)) => {
                debug!(key = %key, "L1 cache hit");
                return Ok(Some(value));
            }
            Ok(None) => trace!(key = %key, "L1 cache miss, trying L2"),
            Err(e) => warn!(key = %key, error = %e, "L1 cache error, trying L2"),
        }

        match self.l2.get(key).await? {
            Some(value) => {
                debug!(key = %key, "L2 cache hit, backfilling L1");
                if let Err(e) = self.l1.set(key, &value, self.backfill_ttl).await {
                    warn!(key = %key, error = %e, "Failed to backfill L1 cache");
                }
                Ok(Some(value))
            }
            None => {
                trace!(key = %key, "L2 cache miss");
                Ok(None)
            }
        }
    }

    /// L1 is written even when L2 fails; the L2 error is returned afterwards.
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()> {
        let l2_result = self.l2.set(key, value, ttl).await;
        self.l1.set(key, value, ttl).await?;

        match l2_result {
            Ok(()) => {
                debug!(key = %key, "Stored in L2 and L1 caches");
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "L2 cache write failed, stored in L1 only");
                Err(e)
            }
        }
    }
}
