//! Match predicates over serialized tag and folder sets.
//!
//! Each filter is built per query and handed to [`RowStore::scan`]. Values are
//! compared as tokens, never as text patterns, so user input needs no escaping.
//!
//! [`RowStore::scan`]: crate::database::RowStore::scan

use std::borrow::Cow;

use crate::database::RowMatcher;
use crate::services::key_sets::tokens;
use crate::types::bookmark::{FOLDERS_ROOT, FOLDERS_SEPARATOR};

fn as_text(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Matches a `folders` value containing one folder as an exact token.
#[derive(Debug, Clone)]
pub struct FolderFilter {
    folder: String,
}

impl FolderFilter {
    pub fn new(folder: &str) -> Self {
        Self { folder: folder.trim().to_string() }
    }
}

impl RowMatcher for FolderFilter {
    fn matches(&self, raw: &[u8]) -> bool {
        tokens(&as_text(raw)).any(|t| t == self.folder)
    }
}

/// Matches a `tags` value holding at least as many requested tags as were asked for.
///
/// This counts token occurrences, not distinct tags: `a,a` satisfies a
/// request for `[a, b]`. An empty request matches every row.
#[derive(Debug, Clone)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    pub fn new<S: AsRef<str>>(tags: &[S]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.as_ref().trim().to_string()).collect(),
        }
    }

    /// Number of matching tokens a row needs.
    pub fn required(&self) -> usize {
        self.tags.len()
    }
}

impl RowMatcher for TagFilter {
    fn matches(&self, raw: &[u8]) -> bool {
        let required = self.required();
        if required == 0 {
            return true;
        }
        let text = as_text(raw);
        let mut hits = 0;
        for token in tokens(&text) {
            if self.tags.iter().any(|t| t == token) {
                hits += 1;
                if hits >= required {
                    return true;
                }
            }
        }
        false
    }
}

/// Normalizes a folder root: trailing separators are dropped, empty means the global root.
pub fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_end_matches(FOLDERS_SEPARATOR);
    if trimmed.is_empty() {
        FOLDERS_ROOT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Prefix every strict descendant of a normalized `root` starts with.
pub fn descendant_prefix(root: &str) -> String {
    if root == FOLDERS_ROOT {
        FOLDERS_ROOT.to_string()
    } else {
        format!("{}{}", root, FOLDERS_SEPARATOR)
    }
}

/// True when `token` lies strictly below the normalized `root`.
pub fn is_descendant(token: &str, root: &str, prefix: &str) -> bool {
    token.len() > root.len() && token.starts_with(prefix)
}

/// Cheap pre-filter for the folder tree: some token lies below `root`.
#[derive(Debug, Clone)]
pub struct FolderPrefixFilter {
    root: String,
    prefix: String,
}

impl FolderPrefixFilter {
    pub fn new(root: &str) -> Self {
        let root = normalize_root(root);
        let prefix = descendant_prefix(&root);
        Self { root, prefix }
    }
}

impl RowMatcher for FolderPrefixFilter {
    fn matches(&self, raw: &[u8]) -> bool {
        tokens(&as_text(raw)).any(|t| is_descendant(t, &self.root, &self.prefix))
    }
}
