//! User records as persisted in the directory.
//!
//! A [`User`] is what the store holds; a [`NewUser`] is a candidate that has
//! not been assigned an id yet. Ids are assigned only by
//! [`UserStore::append`](crate::store::UserStore::append).

pub mod email_address;

pub use email_address::EmailAddress;

use serde::{Deserialize, Serialize};

/// A stored user record.
///
/// The serialized field order (`id`, `name`, `email`, `address`, `phone`)
/// is the on-disk and on-the-wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Positive, unique, immutable once assigned.
    pub id: u64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// A user candidate awaiting an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

impl NewUser {
    /// Create a candidate from its four fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Attach an id, producing the record to persist.
    pub fn with_id(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            phone: self.phone,
        }
    }
}
