use thiserror::Error;

/// Digit alphabet, lowercase first, then uppercase, then digits.
///
/// The order is what makes generated codes reproducible across deployments;
/// changing it changes every code produced from now on.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const BASE: u64 = 62;

/// `62^10 < u64::MAX < 62^11`, so no encoded `u64` is longer than this.
const MAX_ENCODED_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base62Error {
    #[error("empty input")]
    Empty,
    #[error("invalid base62 character {0:?}")]
    InvalidCharacter(char),
    #[error("value does not fit in 64 bits: {0}")]
    Overflow(String),
}

/// Encodes `value` as base-62, most significant digit first.
///
/// Zero encodes to the first alphabet symbol (`"a"`) rather than the empty
/// string, so every value has a non-empty code.
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(MAX_ENCODED_LEN);
    while value > 0 {
        digits.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }
    digits.reverse();

    // Every byte comes from the ASCII alphabet.
    digits.into_iter().map(char::from).collect()
}

/// Decodes a base-62 string produced by [`encode`].
pub fn decode(input: &str) -> Result<u64, Base62Error> {
    if input.is_empty() {
        return Err(Base62Error::Empty);
    }

    input.chars().try_fold(0_u64, |acc, c| {
        let digit = digit_value(c).ok_or(Base62Error::InvalidCharacter(c))?;
        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Base62Error::Overflow(input.to_string()))
    })
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        'a'..='z' => c as u64 - 'a' as u64,
        'A'..='Z' => c as u64 - 'A' as u64 + 26,
        '0'..='9' => c as u64 - '0' as u64 + 52,
        _ => return None,
    };
    Some(value)
}
