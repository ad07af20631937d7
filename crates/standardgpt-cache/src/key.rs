//! Cache keys: blake3 over the operation kind and the normalized payload.

use standardgpt_core::constants::CACHE_KEY_PREVIEW_CHARS;

const SEPARATOR: u8 = 0x1F;

/// Deterministic key for `(kind, payload)`.
///
/// Runs of whitespace collapse to one space and the ends are trimmed, so
/// formatting noise in a rendered prompt does not split the cache.
pub fn cache_key(kind: &str, payload: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(kind.as_bytes());
    hasher.update(&[SEPARATOR]);
    for (i, word) in payload.split_whitespace().enumerate() {
        if i > 0 {
            hasher.update(b" ");
        }
        hasher.update(word.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Key prefix for logs and stats listings.
pub fn short_key(key: &str) -> &str {
    let end = key
        .char_indices()
        .nth(CACHE_KEY_PREVIEW_CHARS)
        .map_or(key.len(), |(i, _)| i);
    &key[..end]
}
