use async_trait::async_trait;
use snip_cache::NullCache;
use snip_core::mask::mask_url;
use snip_core::{
    CacheKey, Insertion, Repository, ShortCode, Shortener, ShortenerError, StorageError, UrlCache,
};
use snip_generator::Generator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Lifetime of both cache directions written by the service.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository`, a `Generator` and a `UrlCache`:
/// - codes are derived from the URL by the generator
/// - the repository is the source of truth and the arbiter of duplicates
/// - the cache is consulted first and written best-effort in both directions
///
/// Without [`with_cache`](ShortenerService::with_cache) the service runs on
/// [`NullCache`] and every lookup goes to the repository.
#[derive(Debug)]
pub struct ShortenerService<R, G, C = NullCache> {
    repository: Arc<R>,
    generator: Arc<G>,
    cache: Arc<C>,
    cache_ttl: Duration,
}

impl<R, G, C> Clone for ShortenerService<R, G, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            cache: Arc::clone(&self.cache),
            cache_ttl: self.cache_ttl,
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G, NullCache> {
    /// Creates an uncached service.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            cache: Arc::new(NullCache),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl<R: Repository, G: Generator, C: UrlCache> ShortenerService<R, G, C> {
    /// Puts `cache` in front of the repository; entries expire after `ttl`.
    pub fn with_cache<C2: UrlCache>(self, cache: C2, ttl: Duration) -> ShortenerService<R, G, C2> {
        ShortenerService {
            repository: self.repository,
            generator: self.generator,
            cache: Arc::new(cache),
            cache_ttl: ttl,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Reports whether `url` has been shortened, consulting the cache first.
    pub async fn is_shortened(&self, url: &str) -> Result<bool> {
        if self.cache.get_or_miss(&CacheKey::url(url)).await.is_some() {
            trace!(url = %mask_url(url), "URL found in cache");
            return Ok(true);
        }
        Ok(self.repository.exists(url).await?)
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes both cache directions. Failures are logged by the cache wrapper.
    async fn remember(&self, url: &str, code: &ShortCode) {
        self.cache
            .set_or_warn(&CacheKey::url(url), code.as_str(), self.cache_ttl)
            .await;
        self.cache
            .set_or_warn(&CacheKey::code(code), url, self.cache_ttl)
            .await;
    }

    async fn cached_code(&self, url: &str) -> Option<ShortCode> {
        let cached = self.cache.get_or_miss(&CacheKey::url(url)).await?;
        match ShortCode::new(cached) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!(url = %mask_url(url), error = %e, "Ignoring malformed cached short code");
                None
            }
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: UrlCache> Shortener for ShortenerService<R, G, C> {
    async fn shorten(&self, url: &str) -> Result<ShortCode> {
        Self::validate_url(url)?;
        let masked = mask_url(url);

        if let Some(code) = self.cached_code(url).await {
            debug!(url = %masked, code = %code, "URL already shortened (cache)");
            return Ok(code);
        }

        // A stored code wins over a freshly generated one so that existing
        // redirects keep working if the generator ever changes.
        if let Some(record) = self.repository.find_by_url(url).await? {
            debug!(url = %masked, code = %record.short_code, "URL already shortened");
            self.remember(url, &record.short_code).await;
            return Ok(record.short_code);
        }

        let code = self.generator.generate(url);

        match self.repository.insert_or_ignore(url, &code).await {
            Ok(Insertion::Created) => {
                self.remember(url, &code).await;
                info!(url = %masked, code = %code, "Link added successfully");
                Ok(code)
            }
            Ok(Insertion::AlreadyExists) => {
                info!(url = %masked, "URL was inserted by another request");
                let stored = self
                    .repository
                    .find_by_url(url)
                    .await?
                    .map(|record| record.short_code)
                    .unwrap_or(code);
                Ok(stored)
            }
            Err(StorageError::Conflict(taken)) => {
                warn!(url = %masked, code = %taken, "Short code already belongs to another URL");
                Err(ShortenerError::CodeCollision(taken))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        let code = ShortCode::new(code)?;

        if let Some(url) = self.cache.get_or_miss(&CacheKey::code(&code)).await {
            debug!(code = %code, "Cache hit for short code");
            return Ok(url);
        }

        match self.repository.find_by_code(&code).await? {
            Some(record) => {
                self.remember(&record.url, &code).await;
                debug!(code = %code, url = %mask_url(&record.url), "Resolved short code");
                Ok(record.url)
            }
            None => {
                debug!(code = %code, "Short code not found");
                Err(ShortenerError::NotFound(code.into_inner()))
            }
        }
    }
}
