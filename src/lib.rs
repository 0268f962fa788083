//! Marktables: per-user bookmark tables over a generic row store.
//!
//! Bookmarks are rows keyed by a content hash of their URL. On top of the
//! rows the crate answers two derived queries: the folder tree a user has
//! built, and bookmarks matching a folder or a set of tags.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
