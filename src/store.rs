//! User store: id assignment and lookups over a [`UserRepository`].
//!
//! Every operation reloads the full collection from the repository; nothing
//! is cached between calls. `append` is a read-modify-write:
//!
//! ```text
//! load() -> users ; id = users.len() + 1 ; users.push(candidate + id) ; save(users)
//! ```
//!
//! Two unserialized appends that interleave between their `load` and `save`
//! both compute the same id and the later `save` wins. [`UserStore::new`]
//! keeps that behavior; [`UserStore::serialized`] holds a single-writer lock
//! across the whole read-modify-write so ids stay unique within one process.

use crate::storage::{StorageError, UserRepository};
use crate::user::{NewUser, User};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append and scan operations over the user collection.
pub struct UserStore<R> {
    repository: R,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl<R: UserRepository> UserStore<R> {
    /// Store with the plain read-modify-write append.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            write_lock: None,
        }
    }

    /// Store whose appends run one at a time.
    pub fn serialized(repository: R) -> Self {
        Self {
            repository,
            write_lock: Some(Arc::new(Mutex::new(()))),
        }
    }

    /// Whether appends are serialized.
    pub fn is_serialized(&self) -> bool {
        self.write_lock.is_some()
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Append `candidate` with the next id (`count + 1`) and return that id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the collection cannot be loaded or saved.
    /// A failed save may leave the backing medium partially written.
    pub async fn append(&self, candidate: NewUser) -> Result<u64, StorageError> {
        let _writer = match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let mut users = self.repository.load().await?;
        let id = users.len() as u64 + 1;
        users.push(candidate.with_id(id));
        self.repository.save(&users).await?;

        info!("Stored user {} ({} total)", id, users.len());
        Ok(id)
    }

    /// The full collection, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<User>, StorageError> {
        self.repository.load().await
    }

    /// First user whose id equals `id`, or `None`.
    pub async fn find_by_id(&self, id: u64) -> Result<Option<User>, StorageError> {
        let user = self.list_all().await?.into_iter().find(|u| u.id == id);
        if user.is_none() {
            debug!("No user with id {}", id);
        }
        Ok(user)
    }
}

impl<R: Clone> Clone for UserStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            write_lock: self.write_lock.clone(),
        }
    }
}
