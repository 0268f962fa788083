//! Generic row store.
//!
//! A table is a named collection of rows; a row is a primary key plus an
//! ordered list of named byte fields. [`RowStore`] is the interface the
//! bookmark code drives; [`Database`] implements it on SQLite.

use rusqlite::{params, OptionalExtension};

use super::connection::Database;
use crate::types::errors::StoreError;

/// One stored row: primary key plus ordered named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: Vec<u8>,
    fields: Vec<(String, Vec<u8>)>,
}

impl Row {
    pub fn new(id: impl Into<Vec<u8>>, fields: Vec<(String, Vec<u8>)>) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Returns the raw bytes of a field, if present.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_slice())
    }

    /// Returns a field decoded as UTF-8 (lossily), if present.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| String::from_utf8_lossy(v).into_owned())
    }

    /// Returns a field decoded as UTF-8, or `default` when the row lacks it.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get_str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets a field, replacing it in place or appending it at the end.
    pub fn put(&mut self, key: &str, value: impl Into<Vec<u8>>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Boolean test over one field's raw serialized value, used by scans.
pub trait RowMatcher {
    fn matches(&self, value: &[u8]) -> bool;
}

impl<F> RowMatcher for F
where
    F: Fn(&[u8]) -> bool,
{
    fn matches(&self, value: &[u8]) -> bool {
        self(value)
    }
}

/// Trait defining the row store primitives the bookmark tables are built on.
///
/// Every call is atomic on its own. Callers needing read-modify-write
/// atomicity must serialize per id themselves.
pub trait RowStore: Send + Sync {
    /// Reads one row, `None` when the id is absent.
    fn select(&self, table: &str, id: &[u8]) -> Result<Option<Row>, StoreError>;
    /// Stores a new row. Fails with `Duplicate` when the id is taken.
    fn insert(&self, table: &str, id: &[u8], fields: Vec<(String, Vec<u8>)>) -> Result<(), StoreError>;
    /// Replaces all fields of the row with the same id, creating it if needed.
    fn update(&self, table: &str, row: &Row) -> Result<(), StoreError>;
    /// Removes a row. Absent ids are a no-op.
    fn delete(&self, table: &str, id: &[u8]) -> Result<(), StoreError>;
    /// Returns every row whose `field` satisfies `matcher`, in storage order.
    ///
    /// The result is a snapshot taken when the scan starts: writes committed
    /// later are not visible. Rows lacking `field` never match.
    fn scan(&self, table: &str, field: &str, matcher: &dyn RowMatcher) -> Result<Vec<Row>, StoreError>;
}

fn write_fields(
    tx: &rusqlite::Transaction<'_>,
    table: &str,
    id: &[u8],
    fields: &[(String, Vec<u8>)],
) -> Result<(), rusqlite::Error> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO table_fields (tbl, pk, pos, name, value) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (pos, (name, value)) in fields.iter().enumerate() {
        stmt.execute(params![table, id, pos as i64, name, value])?;
    }
    Ok(())
}

/// Pushes a finished row onto `matched` when its `field` satisfies `matcher`.
fn keep_if_match(row: Row, field: &str, matcher: &dyn RowMatcher, matched: &mut Vec<Row>) {
    if row.get(field).is_some_and(|v| matcher.matches(v)) {
        matched.push(row);
    }
}

impl RowStore for Database {
    fn select(&self, table: &str, id: &[u8]) -> Result<Option<Row>, StoreError> {
        let conn = self.connection()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM table_rows WHERE tbl = ?1 AND pk = ?2",
                params![table, id],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT name, value FROM table_fields WHERE tbl = ?1 AND pk = ?2 ORDER BY pos",
        )?;
        let fields = stmt
            .query_map(params![table, id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, Vec<u8>)>, _>>()?;
        Ok(Some(Row::new(id, fields)))
    }

    fn insert(&self, table: &str, id: &[u8], fields: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO table_rows (tbl, pk) VALUES (?1, ?2)",
            params![table, id],
        )?;
        write_fields(&tx, table, id, &fields)?;
        tx.commit()?;
        tracing::trace!(table, fields = fields.len(), "row inserted");
        Ok(())
    }

    fn update(&self, table: &str, row: &Row) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO table_rows (tbl, pk) VALUES (?1, ?2)",
            params![table, row.id()],
        )?;
        tx.execute(
            "DELETE FROM table_fields WHERE tbl = ?1 AND pk = ?2",
            params![table, row.id()],
        )?;
        write_fields(&tx, table, row.id(), &row.fields)?;
        tx.commit()?;
        tracing::trace!(table, fields = row.len(), "row updated");
        Ok(())
    }

    fn delete(&self, table: &str, id: &[u8]) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM table_fields WHERE tbl = ?1 AND pk = ?2",
            params![table, id],
        )?;
        let affected = tx.execute(
            "DELETE FROM table_rows WHERE tbl = ?1 AND pk = ?2",
            params![table, id],
        )?;
        tx.commit()?;
        tracing::trace!(table, affected, "row delete");
        Ok(())
    }

    fn scan(&self, table: &str, field: &str, matcher: &dyn RowMatcher) -> Result<Vec<Row>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT r.pk, f.name, f.value FROM table_rows r \
             JOIN table_fields f ON f.tbl = r.tbl AND f.pk = r.pk \
             WHERE r.tbl = ?1 ORDER BY r.seq, f.pos",
        )?;
        let mut cursor = stmt.query(params![table])?;

        let mut matched: Vec<Row> = Vec::new();
        let mut current: Option<Row> = None;
        let mut scanned = 0usize;
        while let Some(record) = cursor.next()? {
            let pk: Vec<u8> = record.get(0)?;
            let name: String = record.get(1)?;
            let value: Vec<u8> = record.get(2)?;

            if let Some(row) = current.as_mut().filter(|row| row.id == pk) {
                row.fields.push((name, value));
                continue;
            }
            if let Some(done) = current.replace(Row::new(pk, vec![(name, value)])) {
                scanned += 1;
                keep_if_match(done, field, matcher, &mut matched);
            }
        }
        if let Some(done) = current.take() {
            scanned += 1;
            keep_if_match(done, field, matcher, &mut matched);
        }

        tracing::debug!(table, field, scanned, matched = matched.len(), "table scan");
        Ok(matched)
    }
}
