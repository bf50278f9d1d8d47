//! Resource handlers for reading users
//!
//! Both resources answer with exactly one content item: JSON on success,
//! plain text with a generic message on failure. A profile lookup that finds
//! nothing is a success whose JSON payload is `null`.

use crate::mcp_integration::core::{ReadResourceResult, UserMcpServer};
use crate::sampling::SamplingClient;
use crate::storage::{StorageError, UserRepository};
use crate::user::User;
use log::error;

/// Reply when the collection cannot be read.
pub const LIST_USERS_FAILED: &str = "Error retrieving users";

/// Handle a read of `users://all`
pub async fn handle_list_users<R, C>(server: &UserMcpServer<R, C>, uri: &str) -> ReadResourceResult
where
    R: UserRepository,
    C: SamplingClient,
{
    let rendered = server
        .store
        .list_all()
        .await
        .and_then(|users| serde_json::to_string(&users).map_err(StorageError::from));

    match rendered {
        Ok(text) => ReadResourceResult::json(uri, text),
        Err(e) => {
            error!("Reading {} failed: {}", uri, e);
            ReadResourceResult::plain(uri, LIST_USERS_FAILED)
        }
    }
}

/// Handle a read of `users://{userId}/profile`
///
/// `user_id` is the raw path segment, read by [`parse_user_id`]. A segment
/// without leading digits is looked up as "no match"; the collection is
/// still read so that an unreadable store is reported as such.
pub async fn handle_user_profile<R, C>(
    server: &UserMcpServer<R, C>,
    uri: &str,
    user_id: &str,
) -> ReadResourceResult
where
    R: UserRepository,
    C: SamplingClient,
{
    let rendered = lookup_profile(server, user_id)
        .await
        .and_then(|user| serde_json::to_string(&user).map_err(StorageError::from));

    match rendered {
        Ok(text) => ReadResourceResult::json(uri, text),
        Err(e) => {
            error!("Reading {} failed: {}", uri, e);
            ReadResourceResult::plain(uri, profile_error_message(user_id))
        }
    }
}

/// Reply when a profile cannot be read.
pub fn profile_error_message(user_id: &str) -> String {
    format!("Error retrieving user detail of the id {user_id}")
}

/// Parse a profile path segment as a user id.
///
/// Reads an optional sign followed by the longest run of leading decimal
/// digits and ignores the rest, so `1abc` and `1.5` both name user 1.
/// No digits, a negative value or an overflowing one is `None`.
pub fn parse_user_id(user_id: &str) -> Option<u64> {
    let text = user_id.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() || negative {
        return None;
    }

    digits.parse().ok()
}

async fn lookup_profile<R, C>(
    server: &UserMcpServer<R, C>,
    user_id: &str,
) -> Result<Option<User>, StorageError>
where
    R: UserRepository,
    C: SamplingClient,
{
    match parse_user_id(user_id) {
        Some(id) => server.store.find_by_id(id).await,
        None => server.store.list_all().await.map(|_| None),
    }
}
