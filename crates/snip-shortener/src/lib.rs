//! URL shortener service implementation.
//!
//! [`ShortenerService`] orchestrates the generator, the record store and the
//! lookup cache. Core types are re-exported from `snip_core`.

pub mod service;

pub use service::{ShortenerService, DEFAULT_CACHE_TTL};
pub use snip_core::{ShortCode, Shortener, ShortenerError};
