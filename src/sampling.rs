//! Sampling round trips to the host LLM.
//!
//! A sampling request is a single-turn `createMessage` exchange: one
//! user-role text message out, one completion back. The transport that
//! carries it is behind [`SamplingClient`]; the stdio server implements it by
//! sending a `sampling/createMessage` request to the connected client, and
//! tests implement it with scripted responses.

use crate::error::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A content block in a sampling message or completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SamplingContent {
    /// Plain text.
    Text { text: String },
    /// Base64-encoded image.
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    /// Base64-encoded audio.
    Audio {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl SamplingContent {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text of a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// One message of a sampling conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingMessage {
    pub role: Role,
    pub content: SamplingContent,
}

/// Parameters of a `sampling/createMessage` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingRequest {
    pub messages: Vec<SamplingMessage>,
    pub max_tokens: u32,
}

impl SamplingRequest {
    /// A single user-role text message limited to `max_tokens`.
    pub fn single_turn(instruction: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            messages: vec![SamplingMessage {
                role: Role::User,
                content: SamplingContent::text(instruction),
            }],
            max_tokens,
        }
    }
}

/// Completion returned by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingResponse {
    pub role: Role,
    pub content: SamplingContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl SamplingResponse {
    /// An assistant text completion.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: SamplingContent::text(text),
            model: None,
            stop_reason: None,
        }
    }
}

/// Failures of the sampling round trip itself.
#[derive(Debug)]
pub enum SamplingError {
    /// The connected client did not advertise the sampling capability.
    Unsupported,
    /// The client answered with an error.
    Rejected { code: i64, message: String },
    /// The session closed before a response arrived.
    Disconnected,
    /// The response could not be decoded.
    Malformed { message: String },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::Unsupported => write!(f, "client does not support sampling"),
            SamplingError::Rejected { code, message } => {
                write!(f, "client rejected sampling request ({}): {}", code, message)
            }
            SamplingError::Disconnected => write!(f, "session closed during sampling"),
            SamplingError::Malformed { message } => {
                write!(f, "malformed sampling response: {}", message)
            }
        }
    }
}

impl std::error::Error for SamplingError {}

/// A channel to the host LLM.
pub trait SamplingClient: Send + Sync {
    /// Send one `createMessage` request and wait for the completion.
    fn create_message(
        &self,
        request: SamplingRequest,
    ) -> impl Future<Output = Result<SamplingResponse, SamplingError>> + Send;
}

/// Ask the host to answer `instruction` and return the completion text.
///
/// # Errors
///
/// - [`DirectoryError::Sampling`] if the round trip fails
/// - [`DirectoryError::EmptyGeneration`] if the completion carries no text
///   or only an empty string
pub async fn generate<C: SamplingClient>(
    client: &C,
    instruction: &str,
    max_tokens: u32,
) -> DirectoryResult<String> {
    let response = client
        .create_message(SamplingRequest::single_turn(instruction, max_tokens))
        .await?;

    match response.content.as_text() {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(DirectoryError::EmptyGeneration),
    }
}
