//! Core types and traits for the Snip URL shortener.
//!
//! This crate provides the shared domain types, the base-62 codec and the
//! seam traits implemented by the storage, cache and shortener crates.

pub mod base62;
pub mod cache;
pub mod error;
pub mod mask;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use cache::{CacheKey, UrlCache};
pub use error::{CacheError, ShortenerError, StorageError};
pub use repository::{Insertion, Record, Repository};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
