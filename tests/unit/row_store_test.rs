//! Unit tests for the SQLite implementation of `RowStore`.
//!
//! Rows are written to an in-memory database and read back through select
//! and scan, checking key uniqueness, field order and scan visibility.

use std::cell::Cell;

use marktables::database::{Database, Row, RowMatcher, RowStore};
use marktables::types::errors::StoreError;

const TABLE: &str = "alice_bookmarks";

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, Vec<u8>)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
        .collect()
}

#[test]
fn test_select_missing_row_is_none() {
    let db = setup();
    assert!(db.select(TABLE, b"nope").unwrap().is_none());
}

#[test]
fn test_insert_then_select_keeps_field_order() {
    let db = setup();
    db.insert(TABLE, b"r1", fields(&[("url", "http://a"), ("title", "A"), ("tags", "x,y")]))
        .unwrap();

    let row = db.select(TABLE, b"r1").unwrap().unwrap();
    assert_eq!(row.id(), b"r1");
    let names: Vec<&str> = row.fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["url", "title", "tags"]);
    assert_eq!(row.get_str("tags").as_deref(), Some("x,y"));
}

#[test]
fn test_duplicate_insert_is_rejected() {
    let db = setup();
    db.insert(TABLE, b"r1", fields(&[("url", "http://a")])).unwrap();
    let err = db.insert(TABLE, b"r1", fields(&[("url", "http://b")])).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));

    let row = db.select(TABLE, b"r1").unwrap().unwrap();
    assert_eq!(row.get_str("url").as_deref(), Some("http://a"));
}

#[test]
fn test_tables_are_isolated() {
    let db = setup();
    db.insert("alice_bookmarks", b"r1", fields(&[("url", "http://a")])).unwrap();
    assert!(db.select("bob_bookmarks", b"r1").unwrap().is_none());
    db.insert("bob_bookmarks", b"r1", fields(&[("url", "http://b")])).unwrap();
}

#[test]
fn test_update_replaces_all_fields() {
    let db = setup();
    db.insert(TABLE, b"r1", fields(&[("url", "http://a"), ("title", "old")])).unwrap();

    let mut row = db.select(TABLE, b"r1").unwrap().unwrap();
    row.put("title", "new");
    row.put("visits", "3");
    db.update(TABLE, &row).unwrap();

    let stored = db.select(TABLE, b"r1").unwrap().unwrap();
    assert_eq!(stored, row);
    assert_eq!(stored.len(), 3);
}

#[test]
fn test_delete_removes_row_and_absent_delete_is_noop() {
    let db = setup();
    db.insert(TABLE, b"r1", fields(&[("url", "http://a")])).unwrap();
    db.delete(TABLE, b"r1").unwrap();
    assert!(db.select(TABLE, b"r1").unwrap().is_none());
    db.delete(TABLE, b"r1").unwrap();
    db.delete(TABLE, b"never").unwrap();
}

#[test]
fn test_deleted_id_can_be_reinserted() {
    let db = setup();
    db.insert(TABLE, b"r1", fields(&[("url", "http://a")])).unwrap();
    db.delete(TABLE, b"r1").unwrap();
    db.insert(TABLE, b"r1", fields(&[("url", "http://b")])).unwrap();
    let row = db.select(TABLE, b"r1").unwrap().unwrap();
    assert_eq!(row.get_str("url").as_deref(), Some("http://b"));
}

#[test]
fn test_scan_returns_matches_in_insertion_order() {
    let db = setup();
    db.insert(TABLE, b"c", fields(&[("tags", "rust")])).unwrap();
    db.insert(TABLE, b"a", fields(&[("tags", "go")])).unwrap();
    db.insert(TABLE, b"b", fields(&[("tags", "rust,web")])).unwrap();

    let matcher = |value: &[u8]| value.starts_with(b"rust");
    let rows = db.scan(TABLE, "tags", &matcher).unwrap();
    let ids: Vec<&[u8]> = rows.iter().map(Row::id).collect();
    assert_eq!(ids, vec![&b"c"[..], &b"b"[..]]);
}

#[test]
fn test_scan_skips_rows_without_field() {
    let db = setup();
    db.insert(TABLE, b"r1", fields(&[("url", "http://a")])).unwrap();
    db.insert(TABLE, b"r2", fields(&[("url", "http://b"), ("tags", "")])).unwrap();

    let everything = |_: &[u8]| true;
    let rows = db.scan(TABLE, "tags", &everything).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), b"r2");
    assert_eq!(rows[0].get_str("url").as_deref(), Some("http://b"));
}

/// Matcher that accepts one value and counts how often it is consulted.
struct CountingMatcher {
    wanted: &'static [u8],
    calls: Cell<usize>,
}

impl RowMatcher for CountingMatcher {
    fn matches(&self, value: &[u8]) -> bool {
        self.calls.set(self.calls.get() + 1);
        value == self.wanted
    }
}

#[test]
fn test_scan_tests_each_row_once_and_keeps_only_matches() {
    let db = setup();
    for i in 0..50 {
        let tag = if i % 10 == 0 { "keep" } else { "drop" };
        let id = format!("r{}", i);
        db.insert(TABLE, id.as_bytes(), fields(&[("url", "http://a"), ("tags", tag), ("title", "t")]))
            .unwrap();
    }
    db.insert(TABLE, b"untagged", fields(&[("url", "http://b")])).unwrap();

    let matcher = CountingMatcher { wanted: b"keep", calls: Cell::new(0) };
    let rows = db.scan(TABLE, "tags", &matcher).unwrap();

    assert_eq!(matcher.calls.get(), 50);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| row.get("tags") == Some(&b"keep"[..])));
    assert!(rows.iter().all(|row| row.len() == 3));
    let ids: Vec<&[u8]> = rows.iter().map(Row::id).collect();
    assert_eq!(ids, vec![&b"r0"[..], &b"r10"[..], &b"r20"[..], &b"r30"[..], &b"r40"[..]]);
}

#[test]
fn test_scan_matches_last_row_of_table() {
    let db = setup();
    db.insert(TABLE, b"a", fields(&[("tags", "no")])).unwrap();
    db.insert(TABLE, b"z", fields(&[("tags", "yes"), ("url", "http://z")])).unwrap();

    let matcher = |value: &[u8]| value == b"yes";
    let rows = db.scan(TABLE, "tags", &matcher).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), b"z");
    assert_eq!(rows[0].get_str("url").as_deref(), Some("http://z"));
}

#[test]
fn test_scan_of_empty_table() {
    let db = setup();
    let everything = |_: &[u8]| true;
    assert!(db.scan("nobody_bookmarks", "tags", &everything).unwrap().is_empty());
}

#[test]
fn test_row_put_appends_unknown_and_replaces_known() {
    let mut row = Row::new(b"id".to_vec(), Vec::new());
    assert!(row.is_empty());
    row.put("a", "1");
    row.put("b", "2");
    row.put("a", "3");
    let pairs: Vec<(&str, &[u8])> = row.fields().collect();
    assert_eq!(pairs, vec![("a", &b"3"[..]), ("b", &b"2"[..])]);
    assert_eq!(row.get_or("c", "dflt"), "dflt");
    assert!(row.contains_key("b"));
}
