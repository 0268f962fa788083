//! Folder hierarchy reconstruction.
//!
//! Bookmarks only store the folders they are filed under. The tree below a
//! root is rebuilt by walking every stored folder path up to the root and
//! collecting each ancestor on the way.

use std::collections::BTreeSet;

use crate::database::RowStore;
use crate::services::filters::{descendant_prefix, is_descendant, normalize_root, FolderPrefixFilter};
use crate::services::key_sets::tokens;
use crate::types::bookmark::{BookmarkField, FOLDERS_ROOT, FOLDERS_SEPARATOR};
use crate::types::errors::StoreError;

/// Adds `path` and all its ancestors strictly below `root` to `folders`.
pub fn add_ancestor_chain(folders: &mut BTreeSet<String>, path: &str, root: &str) {
    let mut current = path;
    while !current.is_empty() && current != root {
        folders.insert(current.to_string());
        current = match current.rfind(FOLDERS_SEPARATOR) {
            Some(idx) => &current[..idx],
            None => "",
        };
    }
}

/// Returns every folder at or below `root` in one bookmarks table.
///
/// The set is ordered by plain string comparison, so siblings and deeper
/// descendants interleave (`/a`, `/a/b`, `/a-c`). `root` is included unless it
/// is the global root `/`.
pub fn resolve_folders(
    store: &dyn RowStore,
    table: &str,
    root: &str,
) -> Result<BTreeSet<String>, StoreError> {
    let root = normalize_root(root);
    let prefix = descendant_prefix(&root);
    let key = BookmarkField::Folders.key();

    let rows = store.scan(table, key, &FolderPrefixFilter::new(&root))?;

    let mut folders = BTreeSet::new();
    for row in &rows {
        let Some(value) = row.get_str(key) else {
            continue;
        };
        for token in tokens(&value) {
            if is_descendant(token, &root, &prefix) && !folders.contains(token) {
                add_ancestor_chain(&mut folders, token, &root);
            }
        }
    }

    if root != FOLDERS_ROOT {
        folders.insert(root);
    }
    tracing::debug!(table, rows = rows.len(), folders = folders.len(), "resolved folder tree");
    Ok(folders)
}
