use crate::error::CacheError;
use crate::mask::mask_url;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::fmt::Display;
use std::time::Duration;
use tracing::warn;

pub type Result<T> = std::result::Result<T, CacheError>;

/// One direction of the URL ↔ code mapping.
///
/// Both directions live in the same keyspace, so each key carries a kind
/// tag and a URL can never shadow a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `url → short code`
    Url(String),
    /// `short code → url`
    Code(ShortCode),
}

impl CacheKey {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn code(code: &ShortCode) -> Self {
        Self::Code(code.clone())
    }

    /// Renders the key with a backend-specific prefix, e.g. `snip:code:abc`.
    pub fn render(&self, prefix: &str) -> String {
        match self {
            CacheKey::Url(url) => format!("{prefix}url:{url}"),
            CacheKey::Code(code) => format!("{prefix}code:{code}"),
        }
    }
}

impl Display for CacheKey {
    /// Log-friendly form; long URLs are masked.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Url(url) => write!(f, "url:{}", mask_url(url)),
            CacheKey::Code(code) => write!(f, "code:{code}"),
        }
    }
}

/// A best-effort key-value accelerator in front of the record store.
///
/// A miss is `Ok(None)`. Entries expire after the TTL given to
/// [`set`](UrlCache::set).
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get a cached value.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()>;

    /// Like [`get`](UrlCache::get), but treats every backend error as a miss.
    async fn get_or_miss(&self, key: &CacheKey) -> Option<String> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache error on get, treating as miss");
                None
            }
        }
    }

    /// Like [`set`](UrlCache::set), but logs and swallows backend errors.
    async fn set_or_warn(&self, key: &CacheKey, value: &str, ttl: Duration) {
        if let Err(e) = self.set(key, value, ttl).await {
            warn!(key = %key, error = %e, "Failed to populate cache");
        }
    }
}
