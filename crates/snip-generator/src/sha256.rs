use crate::Generator;
use sha2::{Digest, Sha256};
use snip_core::{base62, ShortCode};
use typed_builder::TypedBuilder;

/// Number of hex digits of the digest kept by default (40 bits).
pub const DEFAULT_PREFIX_HEX_LEN: u8 = 10;

const MAX_PREFIX_HEX_LEN: u8 = 16;

#[derive(Debug, Clone, TypedBuilder)]
/// Derives a code by truncating the SHA-256 digest of the URL and
/// base-62 encoding the truncated value.
///
/// The kept prefix is read straight from the digest bytes, which is
/// value-identical to parsing the leading hex digits in base 16.
pub struct Sha256Generator {
    /// Leading hex digits of the digest to keep, clamped to `1..=16`.
    #[builder(
        default = DEFAULT_PREFIX_HEX_LEN,
        setter(transform = |len: u8| len.clamp(1, MAX_PREFIX_HEX_LEN))
    )]
    prefix_hex_len: u8,
}

impl Sha256Generator {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn prefix_hex_len(&self) -> u8 {
        self.prefix_hex_len
    }

    /// The truncated digest as an integer.
    pub fn truncated_digest(&self, url: &str) -> u64 {
        let digest = Sha256::digest(url.as_bytes());
        let byte_len = usize::from(self.prefix_hex_len.div_ceil(2));

        let value = digest[..byte_len]
            .iter()
            .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));

        // An odd digit count keeps only the high nibble of the last byte.
        if self.prefix_hex_len % 2 == 1 {
            value >> 4
        } else {
            value
        }
    }
}

impl Default for Sha256Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for Sha256Generator {
    fn generate(&self, url: &str) -> ShortCode {
        ShortCode::new_unchecked(base62::encode(self.truncated_digest(url)))
    }
}
