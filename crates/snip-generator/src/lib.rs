pub mod sha256;

pub use sha256::Sha256Generator;

use snip_core::ShortCode;

/// Trait for deriving short codes from URLs.
///
/// Implementations are pure functions of the input URL and don't interact
/// with storage: the same URL always yields the same code. Distinct URLs
/// may collide; detecting that is the record store's job.
pub trait Generator: Send + Sync + 'static {
    fn generate(&self, url: &str) -> ShortCode;
}
