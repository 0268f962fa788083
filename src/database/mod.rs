//! Marktables database layer.
//!
//! Provides SQLite connection management, schema migrations and the generic
//! row store the bookmark tables are built on.
//!
//! # Usage
//!
//! ```no_run
//! use marktables::database::{Database, Row, RowStore};
//!
//! let db = Database::open("marktables.db").expect("failed to open database");
//! db.insert("alice_bookmarks", b"abc", vec![("url".into(), b"http://x".to_vec())])
//!     .expect("insert failed");
//! let row: Option<Row> = db.select("alice_bookmarks", b"abc").expect("select failed");
//! assert!(row.is_some());
//! ```

pub mod connection;
pub mod migrations;
pub mod tables;

pub use connection::Database;
pub use tables::{Row, RowMatcher, RowStore};
