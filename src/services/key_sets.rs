//! Serialization of set-valued fields.
//!
//! Tags and folder paths are stored as one string of tokens joined with
//! [`TAGS_SEPARATOR`]. Tokens are trimmed and empty tokens dropped.

use crate::types::bookmark::TAGS_SEPARATOR;

/// Iterates the trimmed, non-empty tokens of a serialized set, duplicates included.
pub fn tokens(serialized: &str) -> impl Iterator<Item = &str> {
    serialized
        .split(TAGS_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Splits a serialized set into distinct tokens, keeping first-seen order.
pub fn split_keys(serialized: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for token in tokens(serialized) {
        if !keys.iter().any(|k| k == token) {
            keys.push(token.to_string());
        }
    }
    keys
}

/// Joins tokens into their serialized form.
pub fn join_keys<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(TAGS_SEPARATOR)
}

/// Union of two serialized sets: tokens of `existing` first, then new ones from `incoming`.
pub fn union_keys(existing: &str, incoming: &str) -> String {
    let mut keys = split_keys(existing);
    for token in tokens(incoming) {
        if !keys.iter().any(|k| k == token) {
            keys.push(token.to_string());
        }
    }
    join_keys(keys)
}
