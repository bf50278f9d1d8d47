//! Tool handlers for user creation
//!
//! Both tools follow the same shape:
//!
//! ```text
//! Received → Validating ─┬─ Invalid ───────────────────────────────▶ Responded(error)
//!                        └─ Valid → Persisting ─┬─ StorageFailure ─▶ Responded(error)
//!                                               └─ Persisted ──────▶ Responded(success)
//! ```
//!
//! For `create-user` the validation happens in the protocol layer before the
//! handler is entered. For `create-random-user` it is the sampling round trip
//! followed by the generated-text pipeline in [`codec`](crate::codec).

use crate::codec;
use crate::error::{DirectoryError, DirectoryResult};
use crate::mcp_integration::core::{CallToolResult, UserMcpServer};
use crate::sampling::{self, SamplingClient};
use crate::storage::UserRepository;
use crate::user::NewUser;
use log::{debug, error, warn};

/// Reply when `create-user` fails after validation.
pub const CREATE_USER_FAILED: &str = "Error creating user";
/// Reply when the sampling round trip produced no usable text.
pub const GENERATION_FAILED: &str = "Failed to generate user";
/// Reply when generated text could not be turned into a stored user.
pub const GENERATED_DATA_FAILED: &str = "Failed to generate user data";

/// Fixed instruction sent to the host LLM by `create-random-user`.
pub const RANDOM_USER_INSTRUCTION: &str = "Generate fake user data. The user should have a \
    realistic name, email, address, and phone number. Return this data as a JSON object with \
    no other text or formatter so it can be used with JSON.parse.";

/// Handle `create-user` with already validated arguments
pub async fn handle_create_user<R, C>(
    server: &UserMcpServer<R, C>,
    candidate: NewUser,
) -> CallToolResult
where
    R: UserRepository,
    C: SamplingClient,
{
    match server.store.append(candidate).await {
        Ok(id) => CallToolResult::text(format!("User created with ID: {id}")),
        Err(e) => {
            error!("create-user failed: {}", e);
            CallToolResult::text(CREATE_USER_FAILED)
        }
    }
}

/// Handle `create-random-user`
///
/// An empty or failed generation short-circuits before the store is touched.
pub async fn handle_create_random_user<R, C>(server: &UserMcpServer<R, C>) -> CallToolResult
where
    R: UserRepository,
    C: SamplingClient,
{
    match create_random_user(server).await {
        Ok(id) => CallToolResult::text(format!("Random user created with ID: {id}")),
        Err(DirectoryError::EmptyGeneration) => {
            warn!("create-random-user: host returned no text");
            CallToolResult::text(GENERATION_FAILED)
        }
        Err(DirectoryError::Sampling(e)) => {
            warn!("create-random-user: sampling failed: {}", e);
            CallToolResult::text(GENERATION_FAILED)
        }
        Err(e @ DirectoryError::InvalidGeneratedData(_)) => {
            warn!("create-random-user: {}", e);
            CallToolResult::text(GENERATED_DATA_FAILED)
        }
        Err(e @ (DirectoryError::Storage(_) | DirectoryError::InvalidInput { .. })) => {
            error!("create-random-user failed: {}", e);
            CallToolResult::text(GENERATED_DATA_FAILED)
        }
    }
}

async fn create_random_user<R, C>(server: &UserMcpServer<R, C>) -> DirectoryResult<u64>
where
    R: UserRepository,
    C: SamplingClient,
{
    let text = sampling::generate(
        &server.sampler,
        RANDOM_USER_INSTRUCTION,
        server.sampling_max_tokens,
    )
    .await?;

    let payload = codec::parse_generated_json(codec::normalize_generated_text(&text))?;
    debug!("Random user data: {}", payload);
    let candidate = codec::shape_generated_user(payload)?;

    Ok(server.store.append(candidate).await?)
}
