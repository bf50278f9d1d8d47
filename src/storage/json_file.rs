//! JSON-file storage implementation for the user collection.
//!
//! The collection lives in a single file holding one JSON array of users,
//! pretty-printed with two-space indentation. Every save rewrites the whole
//! file; there is no journal and no version field.
//!
//! # File Creation Behavior
//!
//! - A missing file loads as an empty collection
//! - `save` creates missing parent directories before writing
//! - A file that is not a JSON array of users is reported as
//!   [`StorageError::Corrupted`] or [`StorageError::Serialization`]
//!
//! # Usage
//!
//! ```rust,no_run
//! use user_directory::storage::{JsonFileStorage, UserRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = JsonFileStorage::new("data/users.json");
//! let users = storage.load().await?;
//! println!("{} users on disk", users.len());
//! # Ok(())
//! # }
//! ```

use crate::storage::{StorageError, UserRepository};
use crate::user::User;
use log::{debug, trace};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed storage holding the collection as one JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage instance for the file at `path`.
    ///
    /// Nothing is touched on disk until the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<User>, StorageError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_array() {
            return Err(StorageError::corrupted(format!(
                "{} does not hold a JSON array",
                self.path.display()
            )));
        }

        Ok(serde_json::from_value(value)?)
    }
}

impl UserRepository for JsonFileStorage {
    async fn load(&self) -> Result<Vec<User>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "User file {} does not exist yet, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let users = self.decode(&bytes)?;
        trace!("Loaded {} users from {}", users.len(), self.path.display());
        Ok(users)
    }

    async fn save(&self, users: &[User]) -> Result<(), StorageError> {
        let body = serde_json::to_string_pretty(users)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io(parent, e))?;
            }
        }

        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        trace!("Saved {} users to {}", users.len(), self.path.display());
        Ok(())
    }
}
