use serde::{Deserialize, Serialize};

/// Top of the folder namespace. Never reported as a folder itself.
pub const FOLDERS_ROOT: &str = "/";
/// Folder assigned to bookmarks filed nowhere else.
pub const FOLDERS_UNSORTED: &str = "/unsorted";
/// Folder used by importers for bookmarks without folder information.
pub const FOLDERS_IMPORTED: &str = "/imported";

/// Joins tokens of a set-valued field (tags and folder paths alike).
pub const TAGS_SEPARATOR: &str = ",";
/// Separates path segments inside one folder token.
pub const FOLDERS_SEPARATOR: &str = "/";

/// Logical tables kept per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Bookmarks,
    Tags,
    Folders,
}

impl TableKind {
    /// Suffix appended to the user identifier.
    pub fn suffix(self) -> &'static str {
        match self {
            TableKind::Bookmarks => "_bookmarks",
            TableKind::Tags => "_tags",
            TableKind::Folders => "_folders",
        }
    }

    pub fn table_name(self, user: &str) -> String {
        format!("{}{}", user, self.suffix())
    }
}

/// How a field is combined when an upsert hits an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeCategory {
    /// Replaced when supplied, kept otherwise.
    Plain,
    /// Set once, never overwritten.
    DateAdded,
    /// Stamped with the current time on every write.
    DateModified,
    /// Token set: unioned in import mode, replaced otherwise.
    SetUnionable,
}

/// Static description of one bookmark field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: BookmarkField,
    pub key: &'static str,
    pub default: &'static str,
    pub merge: MergeCategory,
    /// Attribute name in Netscape bookmark HTML exports.
    pub html_attr: &'static str,
    /// Attribute name in XBEL exports.
    pub xbel_attr: &'static str,
    /// Property name in JSON exports.
    pub json_attr: &'static str,
    /// Coarse semantic type of the value.
    pub kind: &'static str,
}

/// Recognized bookmark fields, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookmarkField {
    Url,
    Title,
    Desc,
    DateAdded,
    DateModified,
    DateVisited,
    Public,
    Tags,
    Visits,
    Folders,
}

#[allow(clippy::too_many_arguments)]
const fn descriptor(
    field: BookmarkField,
    key: &'static str,
    default: &'static str,
    merge: MergeCategory,
    html_attr: &'static str,
    xbel_attr: &'static str,
    json_attr: &'static str,
    kind: &'static str,
) -> FieldDescriptor {
    FieldDescriptor { field, key, default, merge, html_attr, xbel_attr, json_attr, kind }
}

/// The field schema. Creation defaults and merge policy are driven from here.
pub static BOOKMARK_SCHEMA: [FieldDescriptor; 10] = [
    //         field                         key              default       merge                          html             xbel           json            kind
    descriptor(BookmarkField::Url,          "url",           "",           MergeCategory::Plain,          "href",          "href",        "uri",          "link"),
    descriptor(BookmarkField::Title,        "title",         "",           MergeCategory::Plain,          "",              "",            "title",        "meta"),
    descriptor(BookmarkField::Desc,         "desc",          "",           MergeCategory::Plain,          "",              "",            "",             "comment"),
    descriptor(BookmarkField::DateAdded,    "date_added",    "",           MergeCategory::DateAdded,      "add_date",      "added",       "dateAdded",    "date"),
    descriptor(BookmarkField::DateModified, "date_modified", "",           MergeCategory::DateModified,   "last_modified", "modified",    "lastModified", "date"),
    descriptor(BookmarkField::DateVisited,  "date_visited",  "",           MergeCategory::Plain,          "last_visited",  "visited",     "",             "date"),
    descriptor(BookmarkField::Public,       "public",        "false",      MergeCategory::Plain,          "",              "yacy:public", "",             "lock"),
    descriptor(BookmarkField::Tags,         "tags",          "unsorted",   MergeCategory::SetUnionable,   "shortcuturl",   "yacy:tags",   "keyword",      "tag"),
    descriptor(BookmarkField::Visits,       "visits",        "0",          MergeCategory::Plain,          "",              "yacy:visits", "",             "stat"),
    descriptor(BookmarkField::Folders,      "folders",       FOLDERS_UNSORTED, MergeCategory::SetUnionable, "",            "",            "",             "folder"),
];

impl BookmarkField {
    /// Returns the schema entry for this field.
    pub fn descriptor(self) -> &'static FieldDescriptor {
        &BOOKMARK_SCHEMA[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    pub fn default_value(self) -> &'static str {
        self.descriptor().default
    }

    /// Looks a field up by its storage key.
    pub fn from_key(key: &str) -> Option<BookmarkField> {
        BOOKMARK_SCHEMA.iter().find(|d| d.key == key).map(|d| d.field)
    }
}

/// Typed view of one stored bookmark with schema defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub desc: String,
    pub date_added: String,
    pub date_modified: String,
    pub date_visited: String,
    pub public: String,
    pub tags: Vec<String>,
    pub visits: String,
    pub folders: Vec<String>,
}

/// Typed input for an upsert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub folders: Vec<String>,
}
