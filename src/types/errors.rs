use thiserror::Error;

// === StoreError ===

/// Errors raised by a row store implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The underlying storage failed to read or write.
    #[error("Row store I/O error: {0}")]
    Io(String),
    /// The storage ran out of space or a value exceeded its size limit.
    #[error("Row store capacity exceeded: {0}")]
    ResourceExceeded(String),
    /// An insert targeted an id that already holds a row.
    #[error("Row already exists: {0}")]
    Duplicate(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DiskFull) | Some(rusqlite::ErrorCode::TooBig) => {
                StoreError::ResourceExceeded(err.to_string())
            }
            Some(rusqlite::ErrorCode::ConstraintViolation) => StoreError::Duplicate(err.to_string()),
            _ => StoreError::Io(err.to_string()),
        }
    }
}

// === BookmarkError ===

/// Errors related to bookmark table operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The request carried no usable URL or otherwise malformed input.
    #[error("Invalid bookmark input: {0}")]
    InvalidInput(String),
    /// No bookmark exists under the given id.
    #[error("Bookmark not found: {0}")]
    NotFound(String),
    /// The row store failed; propagated unchanged.
    #[error("Bookmark storage error: {0}")]
    Io(String),
    /// The row store ran out of capacity.
    #[error("Bookmark storage capacity exceeded: {0}")]
    ResourceExceeded(String),
}

impl From<StoreError> for BookmarkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(msg) => BookmarkError::Io(msg),
            StoreError::ResourceExceeded(msg) => BookmarkError::ResourceExceeded(msg),
            StoreError::Duplicate(msg) => BookmarkError::Io(msg),
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
