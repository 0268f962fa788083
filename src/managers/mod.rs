// Marktables state managers
// Managers drive the row store: bookmark writes, reads and queries, with per-id write serialization.

pub mod bookmark_manager;
pub mod id_locks;
