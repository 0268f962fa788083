//! Unit tests for the Database connection wrapper and schema migrations.
//!
//! These tests open in-memory and file-backed databases and check that the
//! row store tables exist and that migrations are recorded exactly once.

use marktables::database::migrations::{self, get_schema_version, CURRENT_SCHEMA_VERSION};
use marktables::database::{Database, RowStore};
use tempfile::TempDir;

fn table_exists(db: &Database, name: &str) -> bool {
    let conn = db.connection().unwrap();
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

#[test]
fn test_open_in_memory_creates_row_tables() {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    assert!(table_exists(&db, "table_rows"));
    assert!(table_exists(&db, "table_fields"));
    assert!(table_exists(&db, "schema_version"));
}

#[test]
fn test_scan_index_exists() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_table_rows_tbl_seq'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection().unwrap();
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection().unwrap();
    migrations::run_all(&conn).unwrap();
    migrations::run_all(&conn).unwrap();

    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, CURRENT_SCHEMA_VERSION as i64);
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_file_database_persists_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("marks.db");

    {
        let db = Database::open(&path).unwrap();
        db.insert("bob_bookmarks", b"k1", vec![("url".to_string(), b"http://a".to_vec())])
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let row = db.select("bob_bookmarks", b"k1").unwrap().expect("row survives reopen");
    assert_eq!(row.get_str("url").as_deref(), Some("http://a"));
}

#[test]
fn test_open_fails_for_unwritable_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("nested").join("marks.db");
    assert!(Database::open(&path).is_err());
}
