//! App Core for Marktables.
//!
//! Wires settings, the SQLite row store and the bookmark manager together.

use std::path::Path;

use crate::database::connection::Database;
use crate::managers::bookmark_manager::BookmarkManager;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::settings::StoreSettings;

/// Central application struct holding the manager and its settings.
///
/// The manager owns the database; reach the store through `bookmarks.store()`.
pub struct App {
    pub bookmarks: BookmarkManager<Database>,
    pub settings: StoreSettings,
}

impl App {
    /// Creates an App on the database file at `db_path` with default settings.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_settings(db_path, StoreSettings::default())
    }

    /// Creates an App from a settings engine, opening the database it names.
    ///
    /// The parent directory of the database is created when missing.
    pub fn from_settings(engine: &mut SettingsEngine) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = engine.load()?;
        let db_path = engine.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data directory {}: {}", parent.display(), e))?;
        }
        let db_path = db_path.to_string_lossy().to_string();
        Self::with_settings(&db_path, settings)
    }

    fn with_settings(db_path: &str, settings: StoreSettings) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(Path::new(db_path))?;
        tracing::info!(path = db_path, "bookmark store opened");
        Ok(Self {
            bookmarks: BookmarkManager::new(db),
            settings,
        })
    }

    /// Import mode applied when a request does not specify one.
    pub fn default_import_mode(&self) -> bool {
        self.settings.bookmarks.import_mode_default
    }
}
