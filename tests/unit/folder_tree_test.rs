//! Unit tests for folder hierarchy resolution.
//!
//! Bookmarks are filed with folder paths through the manager, then the
//! resolved tree below a root is compared against the expected folders.

use std::collections::{BTreeSet, HashMap};

use marktables::database::Database;
use marktables::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use marktables::services::folder_tree::add_ancestor_chain;
use rstest::rstest;

const USER: &str = "carol";

fn setup() -> BookmarkManager<Database> {
    BookmarkManager::new(Database::open_in_memory().expect("Failed to open in-memory database"))
}

fn file(mgr: &BookmarkManager<Database>, url: &str, folders: &str) {
    let mut fields = HashMap::new();
    fields.insert("url".to_string(), url.to_string());
    fields.insert("folders".to_string(), folders.to_string());
    mgr.upsert(USER, &fields, false).unwrap();
}

fn resolved(mgr: &BookmarkManager<Database>, root: &str) -> Vec<String> {
    mgr.resolve_folders(USER, root).unwrap().into_iter().collect()
}

#[test]
fn test_global_root_lists_every_ancestor() {
    let mgr = setup();
    file(&mgr, "http://x", "/unsorted/foo/bar");

    assert_eq!(
        resolved(&mgr, "/"),
        vec!["/unsorted", "/unsorted/foo", "/unsorted/foo/bar"]
    );
}

#[test]
fn test_nested_root_includes_itself() {
    let mgr = setup();
    file(&mgr, "http://x", "/unsorted/foo/bar");
    file(&mgr, "http://y", "/work/rust");

    assert_eq!(
        resolved(&mgr, "/unsorted"),
        vec!["/unsorted", "/unsorted/foo", "/unsorted/foo/bar"]
    );
}

#[test]
fn test_trailing_separator_on_root_is_ignored() {
    let mgr = setup();
    file(&mgr, "http://x", "/work/rust");
    assert_eq!(resolved(&mgr, "/work/"), vec!["/work", "/work/rust"]);
}

#[test]
fn test_siblings_interleave_lexicographically() {
    let mgr = setup();
    file(&mgr, "http://x", "/a-c,/a/b");
    file(&mgr, "http://y", "/a");

    assert_eq!(resolved(&mgr, "/"), vec!["/a", "/a-c", "/a/b"]);
}

#[test]
fn test_folders_outside_root_are_ignored() {
    let mgr = setup();
    file(&mgr, "http://x", "/work/rust,/home/garden");
    file(&mgr, "http://y", "/workshop/tools");

    assert_eq!(resolved(&mgr, "/work"), vec!["/work", "/work/rust"]);
}

#[test]
fn test_empty_table_yields_root_only() {
    let mgr = setup();
    assert!(resolved(&mgr, "/").is_empty());
    assert_eq!(resolved(&mgr, "/nothing"), vec!["/nothing"]);
}

#[test]
fn test_default_folder_appears_under_global_root() {
    let mgr = setup();
    let mut fields = HashMap::new();
    fields.insert("url".to_string(), "http://plain".to_string());
    mgr.upsert(USER, &fields, false).unwrap();

    assert_eq!(resolved(&mgr, "/"), vec!["/unsorted"]);
}

#[rstest]
#[case("/a/b/c", "/", vec!["/a", "/a/b", "/a/b/c"])]
#[case("/a/b/c", "/a", vec!["/a/b", "/a/b/c"])]
#[case("/a", "/a", vec![])]
#[case("/x/y", "/a", vec!["/x", "/x/y"])]
fn test_ancestor_chain(#[case] path: &str, #[case] root: &str, #[case] expected: Vec<&str>) {
    let mut set = BTreeSet::new();
    add_ancestor_chain(&mut set, path, root);
    assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), expected);
}
