//! Error types for the storage layer.

use datacast_morph::MorphError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Encoding, decoding or decrypting a column value failed.
    #[error(transparent)]
    Morph(#[from] MorphError),

    /// Plain column text is not JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No cast is declared for the column.
    #[error("no cast declared for column {0:?}")]
    UnknownColumn(String),

    /// Value does not fit the column's cast.
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// True when stored ciphertext could not be opened.
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Morph(err) if err.is_decryption())
    }

    pub fn morph(&self) -> Option<&MorphError> {
        match self {
            Self::Morph(err) => Some(err),
            _ => None,
        }
    }
}
