//! Content-hash bookmark ids.
//!
//! An id is the URL-safe base64 encoding of the first 9 bytes of the
//! SHA-256 digest of the URL, giving a 12 character key.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::digest;

use crate::types::errors::BookmarkError;

const ID_DIGEST_BYTES: usize = 9;

/// Checks that `url` is usable as a bookmark key and returns it trimmed.
///
/// A usable URL is non-blank and starts with a scheme (`[A-Za-z][A-Za-z0-9+.-]*:`)
/// followed by something.
pub fn validate_url(url: &str) -> Result<&str, BookmarkError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(BookmarkError::InvalidInput("missing url".to_string()));
    }

    let (scheme, rest) = url
        .split_once(':')
        .ok_or_else(|| BookmarkError::InvalidInput(format!("url has no scheme: {}", url)))?;
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok || rest.is_empty() {
        return Err(BookmarkError::InvalidInput(format!("url has no scheme: {}", url)));
    }
    Ok(url)
}

/// Derives the row key of a bookmark from its URL.
///
/// The scheme is case-insensitive; everything after it is hashed verbatim.
pub fn bookmark_id(url: &str) -> Result<String, BookmarkError> {
    let url = validate_url(url)?;
    let normalized = match url.split_once(':') {
        Some((scheme, rest)) => format!("{}:{}", scheme.to_ascii_lowercase(), rest),
        None => url.to_string(),
    };
    let hash = digest::digest(&digest::SHA256, normalized.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(&hash.as_ref()[..ID_DIGEST_BYTES]))
}
