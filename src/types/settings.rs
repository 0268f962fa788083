use serde::{Deserialize, Serialize};

/// Top-level settings for a bookmark table store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub bookmarks: BookmarkSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
            bookmarks: BookmarkSettings::default(),
        }
    }
}

/// Where the row store keeps its data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// SQLite file path. `None` means `marktables.db` in the platform data directory.
    pub database_path: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: None,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `marktables=debug`.
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Behavior of bookmark writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookmarkSettings {
    /// Import mode used when an upsert request does not say.
    #[serde(default)]
    pub import_mode_default: bool,
}
