//! In-memory storage implementation for the user collection.
//!
//! Holds the collection in an `Arc<RwLock<Vec<User>>>`. Cloning the storage
//! clones the handle, not the data, so a test can keep one clone to inspect
//! what the server wrote through another.
//!
//! # Example Usage
//!
//! ```rust
//! use user_directory::storage::{InMemoryStorage, UserRepository};
//! use user_directory::user::NewUser;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::with_users(vec![
//!     NewUser::new("Ada", "ada@example.com", "London", "555-0100").with_id(1),
//! ]);
//!
//! let handle = storage.clone();
//! assert_eq!(handle.load().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::storage::{StorageError, UserRepository};
use crate::user::User;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory storage implementation.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage instance seeded with `users`.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Clear all data (useful for testing).
    pub async fn clear(&self) {
        self.users.write().await.clear();
    }
}

impl UserRepository for InMemoryStorage {
    async fn load(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.users.read().await.clone())
    }

    async fn save(&self, users: &[User]) -> Result<(), StorageError> {
        let mut guard = self.users.write().await;
        *guard = users.to_vec();
        Ok(())
    }
}
