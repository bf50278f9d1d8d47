//! Core MCP integration infrastructure
//!
//! This module contains the server type, its discovery metadata, and the
//! payload types returned by tool calls, resource reads and prompt requests.
//! Every handler returns one of these payloads; none of them can fail.

use crate::config::ServerConfig;
use crate::sampling::{Role, SamplingClient};
use crate::storage::UserRepository;
use crate::store::UserStore;
use serde::{Deserialize, Serialize};

/// Media type of successful resource payloads.
pub const MIME_JSON: &str = "application/json";
/// Media type of resource error payloads.
pub const MIME_TEXT: &str = "text/plain";

/// Default output limit for the sampling round trip of `create-random-user`.
pub const DEFAULT_SAMPLING_MAX_TOKENS: u32 = 1000;

/// Information about the MCP server for client discovery
///
/// # Examples
///
/// ```rust
/// use user_directory::mcp_integration::McpServerInfo;
///
/// let server_info = McpServerInfo {
///     name: "hr-directory".to_string(),
///     version: "2.0.0".to_string(),
///     instructions: Some("Use create-user for known people".to_string()),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerInfo {
    /// Implementation name reported at initialization
    pub name: String,
    /// Implementation version reported at initialization
    pub version: String,
    /// Optional usage hints for the client's model
    pub instructions: Option<String>,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        Self {
            name: "user-directory".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: Some(
                "Create users with create-user or create-random-user, read them from \
                 users://all or users://{userId}/profile."
                    .to_string(),
            ),
        }
    }
}

/// A content block in a tool result or prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Text content
    Text { text: String },
}

impl Content {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text of this block.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
}

impl CallToolResult {
    /// A result holding a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
        }
    }

    /// Text of the first content block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(Content::as_text)
    }
}

/// One content item of a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Result of a resource read. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

impl ReadResourceResult {
    /// A JSON payload for `uri`.
    pub fn json(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::single(uri, MIME_JSON, text)
    }

    /// A plain-text payload for `uri`.
    pub fn plain(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::single(uri, MIME_TEXT, text)
    }

    fn single(uri: impl Into<String>, mime_type: &str, text: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContents {
                uri: uri.into(),
                mime_type: mime_type.to_string(),
                text: text.into(),
            }],
        }
    }
}

/// One message of a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: Content,
}

/// Result of a prompt request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPromptResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

/// MCP server exposing the user directory
///
/// Wraps a [`UserStore`] and a [`SamplingClient`] and exposes them as the
/// `create-user` and `create-random-user` tools, the `users://all` resource,
/// the `users://{userId}/profile` resource template and the
/// `create-fake-user` prompt.
///
/// # Type Parameters
///
/// * `R` - The repository holding the user collection
/// * `C` - The channel used for sampling round trips
///
/// # Examples
///
/// ```rust,no_run
/// use user_directory::mcp_integration::UserMcpServer;
/// use user_directory::sampling::{SamplingClient, SamplingError, SamplingRequest, SamplingResponse};
/// use user_directory::storage::InMemoryStorage;
/// use user_directory::store::UserStore;
/// use serde_json::json;
///
/// struct Canned;
///
/// impl SamplingClient for Canned {
///     async fn create_message(&self, _: SamplingRequest) -> Result<SamplingResponse, SamplingError> {
///         Ok(SamplingResponse::text(r#"{"name":"A","email":"a@b.com","address":"X","phone":"1"}"#))
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = UserMcpServer::new(UserStore::new(InMemoryStorage::new()), Canned);
///
/// let result = server
///     .call_tool("create-user", json!({
///         "name": "Ada", "email": "ada@example.com", "address": "London", "phone": "555"
///     }))
///     .await?;
/// assert_eq!(result.first_text(), Some("User created with ID: 1"));
/// # Ok(())
/// # }
/// ```
pub struct UserMcpServer<R, C> {
    pub(crate) store: UserStore<R>,
    pub(crate) sampler: C,
    pub(crate) server_info: McpServerInfo,
    pub(crate) sampling_max_tokens: u32,
}

impl<R: UserRepository, C: SamplingClient> UserMcpServer<R, C> {
    /// Create a new MCP server with default configuration
    pub fn new(store: UserStore<R>, sampler: C) -> Self {
        Self::with_info(store, sampler, McpServerInfo::default())
    }

    /// Create a new MCP server with custom server information
    pub fn with_info(store: UserStore<R>, sampler: C, server_info: McpServerInfo) -> Self {
        Self {
            store,
            sampler,
            server_info,
            sampling_max_tokens: DEFAULT_SAMPLING_MAX_TOKENS,
        }
    }

    /// Create a server configured from `config`.
    pub fn from_config(store: UserStore<R>, sampler: C, config: &ServerConfig) -> Self {
        Self::with_info(store, sampler, config.server_info.clone())
            .with_sampling_max_tokens(config.sampling_max_tokens)
    }

    /// Override the output limit used by `create-random-user`.
    pub fn with_sampling_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sampling_max_tokens = max_tokens;
        self
    }

    /// Get server information for introspection
    pub fn server_info(&self) -> &McpServerInfo {
        &self.server_info
    }

    /// The backing store.
    pub fn store(&self) -> &UserStore<R> {
        &self.store
    }

    /// The sampling channel.
    pub fn sampler(&self) -> &C {
        &self.sampler
    }
}
