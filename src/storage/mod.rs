//! Storage abstraction for the user collection.
//!
//! The collection is the unit of persistence: every operation loads the
//! whole sequence of users and every mutation saves the whole sequence back.
//! [`UserRepository`] captures exactly that contract, so a backend can be a
//! JSON file, an in-memory vector, or anything transactional without the
//! handlers noticing.
//!
//! The storage layer is responsible for:
//! - Loading and saving the full, ordered collection
//! - Encoding it to and from its persisted form
//!
//! The storage layer is NOT responsible for:
//! - Id assignment (see [`UserStore`](crate::store::UserStore))
//! - Input validation
//! - Serializing concurrent writers
//!
//! # Example Usage
//!
//! ```rust
//! use user_directory::storage::{InMemoryStorage, UserRepository};
//! use user_directory::user::NewUser;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//!
//! let mut users = storage.load().await?;
//! users.push(NewUser::new("Ada", "ada@example.com", "London", "555-0100").with_id(1));
//! storage.save(&users).await?;
//!
//! assert_eq!(storage.load().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;
pub mod json_file;

#[cfg(test)]
pub(crate) mod tests;

pub use errors::StorageError;
pub use in_memory::InMemoryStorage;
pub use json_file::JsonFileStorage;

use crate::user::User;
use std::future::Future;

/// Repository over the full user collection.
///
/// # Design Principles
///
/// - **Whole-collection I/O**: no partial reads, no incremental writes
/// - **Order preserving**: `load` returns users in the order last saved
/// - **No caching**: each `load` observes the current backing state
/// - **Async First**: all operations return futures
pub trait UserRepository: Send + Sync {
    /// Read the full current collection.
    fn load(&self) -> impl Future<Output = Result<Vec<User>, StorageError>> + Send;

    /// Replace the persisted collection with `users`.
    ///
    /// Callers must not assume the write is atomic.
    fn save(&self, users: &[User]) -> impl Future<Output = Result<(), StorageError>> + Send;
}
