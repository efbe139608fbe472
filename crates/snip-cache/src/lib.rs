//! Lookup cache implementations for the shortener.
//!
//! Every backend implements [`UrlCache`]. None of them is a source of
//! truth; the record store is.

pub mod layered;
pub mod moka;
pub mod null;
pub mod redis;

pub use self::moka::{CacheConfig, MokaUrlCache};
pub use self::redis::RedisUrlCache;
pub use layered::LayeredCache;
pub use null::NullCache;
pub use snip_core::cache::{CacheKey, Result, UrlCache};
pub use snip_core::CacheError;
