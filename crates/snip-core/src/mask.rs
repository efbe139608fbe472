use std::borrow::Cow;

const MASK_THRESHOLD: usize = 50;
const KEEP_HEAD: usize = 30;
const KEEP_TAIL: usize = 15;

/// Shortens long URLs for log output: the first 30 and last 15 characters
/// joined by `...`. URLs of 50 characters or fewer are returned untouched.
pub fn mask_url(url: &str) -> Cow<'_, str> {
    let len = url.chars().count();
    if len <= MASK_THRESHOLD {
        return Cow::Borrowed(url);
    }

    let head: String = url.chars().take(KEEP_HEAD).collect();
    let tail: String = url.chars().skip(len - KEEP_TAIL).collect();
    Cow::Owned(format!("{head}...{tail}"))
}
