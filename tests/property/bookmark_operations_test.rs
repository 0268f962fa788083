//! Property-based tests for Bookmark Manager operations.
//!
//! These tests verify the merge rules for arbitrary URLs and tag sets:
//! import mode unions tag sets, date_added never changes once written,
//! and deletion is idempotent.

use std::collections::HashMap;

use marktables::database::Database;
use marktables::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use proptest::prelude::*;

const USER: &str = "prop";

/// Strategy for generating valid URL strings.
/// Produces URLs with http/https scheme, alphanumeric host, and optional path.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for generating a small list of distinct tags.
fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z]{1,8}", 1..5).prop_map(|set| set.into_iter().collect())
}

fn setup() -> BookmarkManager<Database> {
    BookmarkManager::new(Database::open_in_memory().expect("Failed to open in-memory database"))
}

fn upsert(mgr: &BookmarkManager<Database>, url: &str, tags: &[String], import: bool) {
    let mut fields = HashMap::new();
    fields.insert("url".to_string(), url.to_string());
    fields.insert("tags".to_string(), tags.join(","));
    mgr.upsert(USER, &fields, import).unwrap();
}

// Importing a tag set into an existing bookmark yields a superset of both sets.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_import_union_contains_both_sets(
        url in arb_url(),
        first in arb_tags(),
        second in arb_tags(),
    ) {
        let mgr = setup();
        upsert(&mgr, &url, &first, false);
        upsert(&mgr, &url, &second, true);

        let record = mgr.get_bookmark_by_url(USER, &url).unwrap();
        for tag in first.iter().chain(second.iter()) {
            prop_assert!(record.tags.contains(tag), "missing tag {}", tag);
        }
        let mut distinct = record.tags.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(distinct.len(), record.tags.len());
    }

    #[test]
    fn prop_non_import_replaces_set(
        url in arb_url(),
        first in arb_tags(),
        second in arb_tags(),
    ) {
        let mgr = setup();
        upsert(&mgr, &url, &first, false);
        upsert(&mgr, &url, &second, false);

        let record = mgr.get_bookmark_by_url(USER, &url).unwrap();
        prop_assert_eq!(record.tags, second);
    }
}

// date_added is fixed by the first write, whatever later upserts carry.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_date_added_is_invariant(
        url in arb_url(),
        later in proptest::collection::vec((any::<bool>(), "[0-9]{1,6}"), 1..5),
    ) {
        let mgr = setup();
        let mut fields = HashMap::new();
        fields.insert("url".to_string(), url.clone());
        mgr.upsert(USER, &fields, false).unwrap();
        let original = mgr.get_bookmark_by_url(USER, &url).unwrap().date_added;

        for (import, stamp) in later {
            fields.insert("date_added".to_string(), stamp);
            mgr.upsert(USER, &fields, import).unwrap();
        }
        prop_assert_eq!(mgr.get_bookmark_by_url(USER, &url).unwrap().date_added, original);
    }
}

// Deleting a bookmark any number of times succeeds and leaves no row.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_delete_is_idempotent(url in arb_url(), repeats in 1usize..4) {
        let mgr = setup();
        upsert(&mgr, &url, &["x".to_string()], false);

        for _ in 0..repeats {
            prop_assert!(mgr.delete_by_url(USER, &url).is_ok());
        }
        prop_assert!(mgr.get_bookmark_by_url(USER, &url).is_err());
        prop_assert!(mgr.bookmarks_by_tags(USER, &[]).unwrap().is_empty());
    }
}
