//! Bookmark Manager for Marktables.
//!
//! Implements `BookmarkManagerTrait`: create-or-merge upserts, idempotent
//! deletion, reads, URL re-keying and the folder/tag queries, all on top of
//! a [`RowStore`]. Field defaults and merge rules come from
//! [`BOOKMARK_SCHEMA`]; no field is special-cased here.

use std::collections::{BTreeSet, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::database::{Row, RowStore};
use crate::managers::id_locks::IdLocks;
use crate::services::bookmark_id::{bookmark_id, validate_url};
use crate::services::filters::{FolderFilter, TagFilter};
use crate::services::folder_tree;
use crate::services::key_sets::{join_keys, split_keys, union_keys};
use crate::types::bookmark::{
    BookmarkField, BookmarkRecord, MergeCategory, NewBookmark, TableKind, BOOKMARK_SCHEMA,
};
use crate::types::errors::BookmarkError;

/// Trait defining bookmark table operations.
pub trait BookmarkManagerTrait {
    /// Creates the bookmark named by `fields["url"]` or merges `fields` into it.
    fn upsert(&self, user: &str, fields: &HashMap<String, String>, import_mode: bool) -> Result<(), BookmarkError>;
    fn upsert_record(&self, user: &str, bookmark: &NewBookmark, import_mode: bool) -> Result<(), BookmarkError>;
    fn delete_by_id(&self, user: &str, id: &str) -> Result<(), BookmarkError>;
    fn delete_by_url(&self, user: &str, url: &str) -> Result<(), BookmarkError>;
    fn get_bookmark(&self, user: &str, id: &str) -> Result<BookmarkRecord, BookmarkError>;
    fn get_bookmark_by_url(&self, user: &str, url: &str) -> Result<BookmarkRecord, BookmarkError>;
    /// Moves a bookmark to the id of `new_url`. Returns the new id.
    fn rename_url(&self, user: &str, old_url: &str, new_url: &str) -> Result<String, BookmarkError>;
    fn resolve_folders(&self, user: &str, root: &str) -> Result<BTreeSet<String>, BookmarkError>;
    fn bookmarks_by_folder(&self, user: &str, folder: &str) -> Result<Vec<Row>, BookmarkError>;
    fn bookmarks_by_tags(&self, user: &str, tags: &[String]) -> Result<Vec<Row>, BookmarkError>;
}

/// Bookmark manager over any row store.
pub struct BookmarkManager<S: RowStore> {
    store: S,
    locks: IdLocks,
}

/// Returns the supplied value of a field: present and non-empty.
fn supplied<'f>(fields: &'f HashMap<String, String>, field: BookmarkField) -> Option<&'f str> {
    fields
        .get(field.key())
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Like [`supplied`], but yields the validated URL for the `url` field.
fn field_input<'f>(fields: &'f HashMap<String, String>, url: &'f str, field: BookmarkField) -> Option<&'f str> {
    match field {
        BookmarkField::Url => Some(url),
        _ => supplied(fields, field),
    }
}

/// Builds the typed view of a stored row, applying schema defaults.
pub fn record_from_row(row: &Row) -> BookmarkRecord {
    let get = |field: BookmarkField| row.get_or(field.key(), field.default_value());
    BookmarkRecord {
        id: String::from_utf8_lossy(row.id()).into_owned(),
        url: get(BookmarkField::Url),
        title: get(BookmarkField::Title),
        desc: get(BookmarkField::Desc),
        date_added: get(BookmarkField::DateAdded),
        date_modified: get(BookmarkField::DateModified),
        date_visited: get(BookmarkField::DateVisited),
        public: get(BookmarkField::Public),
        tags: split_keys(&get(BookmarkField::Tags)),
        visits: get(BookmarkField::Visits),
        folders: split_keys(&get(BookmarkField::Folders)),
    }
}

impl<S: RowStore> BookmarkManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: IdLocks::new(),
        }
    }

    /// Returns the underlying row store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            .to_string()
    }

    fn table(user: &str) -> String {
        TableKind::Bookmarks.table_name(user)
    }

    /// Field values for a row that does not exist yet.
    fn create_fields(fields: &HashMap<String, String>, url: &str, now: &str) -> Vec<(String, Vec<u8>)> {
        let mut data = Vec::with_capacity(BOOKMARK_SCHEMA.len());
        for d in BOOKMARK_SCHEMA.iter() {
            let input = field_input(fields, url, d.field);
            let value = match d.merge {
                MergeCategory::DateAdded | MergeCategory::DateModified => Some(input.unwrap_or(now)),
                MergeCategory::SetUnionable => Some(input.unwrap_or(d.default)),
                MergeCategory::Plain => input,
            };
            if let Some(value) = value {
                data.push((d.key.to_string(), value.as_bytes().to_vec()));
            }
        }
        data
    }

    /// Applies an upsert to an existing row.
    fn merge_fields(row: &mut Row, fields: &HashMap<String, String>, url: &str, import_mode: bool, now: &str) {
        for d in BOOKMARK_SCHEMA.iter() {
            let input = field_input(fields, url, d.field);
            match d.merge {
                MergeCategory::DateAdded => {
                    if !row.contains_key(d.key) {
                        row.put(d.key, now);
                    }
                }
                MergeCategory::DateModified => row.put(d.key, now),
                MergeCategory::SetUnionable => {
                    let existing = row.get_or(d.key, d.default);
                    let merged = match input {
                        Some(value) if import_mode => union_keys(&existing, value),
                        Some(value) => value.to_string(),
                        None => existing,
                    };
                    row.put(d.key, merged);
                }
                MergeCategory::Plain => {
                    let value = match input {
                        Some(value) => value.to_string(),
                        None => row.get_or(d.key, d.default),
                    };
                    row.put(d.key, value);
                }
            }
        }
    }

    fn select_record(&self, table: &str, id: &str) -> Result<BookmarkRecord, BookmarkError> {
        match self.store.select(table, id.as_bytes())? {
            Some(row) => Ok(record_from_row(&row)),
            None => Err(BookmarkError::NotFound(id.to_string())),
        }
    }
}

impl<S: RowStore> BookmarkManagerTrait for BookmarkManager<S> {
    /// Creates or merges a bookmark.
    ///
    /// The id is derived from the URL once. A later upsert that changes the
    /// `url` field keeps the row under its original id. The stored `url` is
    /// the trimmed value the id was hashed from.
    fn upsert(&self, user: &str, fields: &HashMap<String, String>, import_mode: bool) -> Result<(), BookmarkError> {
        let url = supplied(fields, BookmarkField::Url).ok_or_else(|| {
            tracing::warn!(user, "upsert rejected: no url");
            BookmarkError::InvalidInput("missing url".to_string())
        })?;
        let url = validate_url(url)?;
        let id = bookmark_id(url)?;
        let table = Self::table(user);

        let _guard = self.locks.lock(&table, &id);
        // Clock is read only once the id is held.
        let now = Self::now();
        match self.store.select(&table, id.as_bytes())? {
            None => {
                let data = Self::create_fields(fields, url, &now);
                self.store.insert(&table, id.as_bytes(), data)?;
                tracing::debug!(user, id = %id, "bookmark created");
            }
            Some(mut row) => {
                Self::merge_fields(&mut row, fields, url, import_mode, &now);
                self.store.update(&table, &row)?;
                tracing::debug!(user, id = %id, import_mode, "bookmark merged");
            }
        }
        Ok(())
    }

    fn upsert_record(&self, user: &str, bookmark: &NewBookmark, import_mode: bool) -> Result<(), BookmarkError> {
        let mut fields = HashMap::new();
        fields.insert(BookmarkField::Url.key().to_string(), bookmark.url.clone());
        if let Some(title) = &bookmark.title {
            fields.insert(BookmarkField::Title.key().to_string(), title.clone());
        }
        if let Some(desc) = &bookmark.desc {
            fields.insert(BookmarkField::Desc.key().to_string(), desc.clone());
        }
        if !bookmark.tags.is_empty() {
            fields.insert(BookmarkField::Tags.key().to_string(), join_keys(&bookmark.tags));
        }
        if !bookmark.folders.is_empty() {
            fields.insert(BookmarkField::Folders.key().to_string(), join_keys(&bookmark.folders));
        }
        self.upsert(user, &fields, import_mode)
    }

    /// Removes a bookmark by id. Absent ids succeed.
    fn delete_by_id(&self, user: &str, id: &str) -> Result<(), BookmarkError> {
        if id.trim().is_empty() {
            return Err(BookmarkError::InvalidInput("missing bookmark id".to_string()));
        }
        let table = Self::table(user);
        let _guard = self.locks.lock(&table, id);
        if self.store.select(&table, id.as_bytes())?.is_some() {
            self.store.delete(&table, id.as_bytes())?;
            tracing::debug!(user, id, "bookmark deleted");
        } else {
            tracing::debug!(user, id, "delete of absent bookmark");
        }
        Ok(())
    }

    fn delete_by_url(&self, user: &str, url: &str) -> Result<(), BookmarkError> {
        let id = bookmark_id(url)?;
        self.delete_by_id(user, &id)
    }

    fn get_bookmark(&self, user: &str, id: &str) -> Result<BookmarkRecord, BookmarkError> {
        self.select_record(&Self::table(user), id)
    }

    fn get_bookmark_by_url(&self, user: &str, url: &str) -> Result<BookmarkRecord, BookmarkError> {
        let id = bookmark_id(url)?;
        self.select_record(&Self::table(user), &id)
    }

    /// Re-keys a bookmark under the id of `new_url`.
    ///
    /// The new row is written before the old one is removed. Fails when the
    /// old bookmark is missing or `new_url` is already bookmarked.
    fn rename_url(&self, user: &str, old_url: &str, new_url: &str) -> Result<String, BookmarkError> {
        let old_id = bookmark_id(old_url)?;
        let new_url = validate_url(new_url)?;
        let new_id = bookmark_id(new_url)?;
        let table = Self::table(user);
        let url_key = BookmarkField::Url.key();
        let modified_key = BookmarkField::DateModified.key();

        let _guards = self.locks.lock_pair(&table, &old_id, &new_id);
        let now = Self::now();
        let mut row = self
            .store
            .select(&table, old_id.as_bytes())?
            .ok_or_else(|| BookmarkError::NotFound(old_id.clone()))?;
        row.put(url_key, new_url);
        row.put(modified_key, now.as_str());

        if old_id == new_id {
            self.store.update(&table, &row)?;
            return Ok(new_id);
        }
        if self.store.select(&table, new_id.as_bytes())?.is_some() {
            return Err(BookmarkError::InvalidInput(format!(
                "{} is already bookmarked",
                new_url
            )));
        }

        let data = row
            .fields()
            .map(|(name, value)| (name.to_string(), value.to_vec()))
            .collect();
        self.store.insert(&table, new_id.as_bytes(), data)?;
        self.store.delete(&table, old_id.as_bytes())?;
        tracing::info!(user, old_id = %old_id, new_id = %new_id, "bookmark re-keyed");
        Ok(new_id)
    }

    fn resolve_folders(&self, user: &str, root: &str) -> Result<BTreeSet<String>, BookmarkError> {
        Ok(folder_tree::resolve_folders(&self.store, &Self::table(user), root)?)
    }

    /// Bookmarks filed exactly under `folder`, in storage order.
    fn bookmarks_by_folder(&self, user: &str, folder: &str) -> Result<Vec<Row>, BookmarkError> {
        let filter = FolderFilter::new(folder);
        Ok(self
            .store
            .scan(&Self::table(user), BookmarkField::Folders.key(), &filter)?)
    }

    /// Bookmarks whose tags hold at least `tags.len()` of the requested tags, repeats counted.
    fn bookmarks_by_tags(&self, user: &str, tags: &[String]) -> Result<Vec<Row>, BookmarkError> {
        let filter = TagFilter::new(tags);
        Ok(self
            .store
            .scan(&Self::table(user), BookmarkField::Tags.key(), &filter)?)
    }
}
