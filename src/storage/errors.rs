//! Storage-specific error types for the record collection.
//!
//! These errors describe failures to read or write the backing collection.
//! They carry operator-facing detail only; the protocol handlers replace
//! them with a generic message before anything reaches the client.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or saving the user collection.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The collection could not be encoded or decoded as JSON.
    Serialization { source: serde_json::Error },

    /// The stored data decoded, but is not a collection of users.
    Corrupted { details: String },

    /// The backend refused the operation (used by test doubles and
    /// non-file backends).
    Unavailable { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            StorageError::Serialization { source } => {
                write!(f, "Serialization error: {}", source)
            }
            StorageError::Corrupted { details } => {
                write!(f, "Stored user collection is corrupted: {}", details)
            }
            StorageError::Unavailable { message } => {
                write!(f, "Storage unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            StorageError::Serialization { source } => Some(source),
            _ => None,
        }
    }
}

impl StorageError {
    /// Create a new Io error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new Corrupted error.
    pub fn corrupted(details: impl Into<String>) -> Self {
        Self::Corrupted {
            details: details.into(),
        }
    }

    /// Create a new Unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization { source }
    }
}
