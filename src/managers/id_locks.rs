//! Per-row write serialization.
//!
//! Upsert is a read followed by a write. Two upserts of the same id must not
//! interleave or one merge is lost, so every read-modify-write holds an
//! [`IdGuard`] for its (table, id) pair. Different ids never block each other.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Set of (table, id) keys currently held, with a condvar for waiters.
#[derive(Debug, Default)]
pub struct IdLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

/// Holds one (table, id) key until dropped.
#[derive(Debug)]
pub struct IdGuard<'a> {
    locks: &'a IdLocks,
    key: String,
}

impl IdLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn held(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked.
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until no other caller holds `(table, id)`, then takes it.
    pub fn lock(&self, table: &str, id: &str) -> IdGuard<'_> {
        let key = format!("{}\u{0}{}", table, id);
        let mut held = self.held();
        while held.contains(&key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.clone());
        IdGuard { locks: self, key }
    }

    /// Takes two keys of one table without deadlocking against a caller taking them reversed.
    pub fn lock_pair<'a>(&'a self, table: &str, a: &str, b: &str) -> (IdGuard<'a>, Option<IdGuard<'a>>) {
        if a == b {
            return (self.lock(table, a), None);
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first = self.lock(table, first);
        let second = self.lock(table, second);
        (first, Some(second))
    }

    /// Number of keys currently held.
    pub fn held_count(&self) -> usize {
        self.held().len()
    }
}

impl Drop for IdGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.locks.held();
        held.remove(&self.key);
        drop(held);
        self.locks.released.notify_all();
    }
}
