use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns its short code.
    ///
    /// Shortening an already-known URL succeeds and returns the code that
    /// was stored for it.
    async fn shorten(&self, url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the original URL.
    ///
    /// Returns `Err(ShortenerError::NotFound)` if no mapping exists, which
    /// callers can tell apart from `Err(ShortenerError::Storage)`.
    async fn resolve(&self, code: &str) -> Result<String>;
}
