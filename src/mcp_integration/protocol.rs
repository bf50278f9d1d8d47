//! MCP protocol layer for discovery and dispatch
//!
//! Tool, prompt and resource names form closed sets known at compile time.
//! Each incoming name or URI is resolved into one of the enums below and then
//! matched exhaustively, so adding an operation means adding a variant and
//! the compiler points at every place that has to handle it.

use super::catalog::{self, ALL_USERS_URI};
use super::core::{CallToolResult, GetPromptResult, ReadResourceResult, UserMcpServer};
use super::handlers::{user_prompts, user_resources, user_tools};
use crate::codec;
use crate::error::{DirectoryError, ProtocolError, ProtocolResult};
use crate::sampling::SamplingClient;
use crate::storage::UserRepository;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Registered tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    CreateUser,
    CreateRandomUser,
}

impl ToolName {
    /// Every tool, in listing order.
    pub const ALL: [ToolName; 2] = [ToolName::CreateUser, ToolName::CreateRandomUser];

    /// Wire name of the tool.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CreateUser => "create-user",
            ToolName::CreateRandomUser => "create-random-user",
        }
    }

    fn definition(self) -> Value {
        match self {
            ToolName::CreateUser => catalog::create_user_tool(),
            ToolName::CreateRandomUser => catalog::create_random_user_tool(),
        }
    }
}

impl FromStr for ToolName {
    type Err = ProtocolError;

    fn from_str(name: &str) -> ProtocolResult<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| ProtocolError::UnknownTool(name.to_string()))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptName {
    CreateFakeUser,
}

impl PromptName {
    /// Every prompt, in listing order.
    pub const ALL: [PromptName; 1] = [PromptName::CreateFakeUser];

    /// Wire name of the prompt.
    pub fn as_str(self) -> &'static str {
        match self {
            PromptName::CreateFakeUser => "create-fake-user",
        }
    }

    fn definition(self) -> Value {
        match self {
            PromptName::CreateFakeUser => catalog::create_fake_user_prompt(),
        }
    }
}

impl FromStr for PromptName {
    type Err = ProtocolError;

    fn from_str(name: &str) -> ProtocolResult<Self> {
        Self::ALL
            .into_iter()
            .find(|prompt| prompt.as_str() == name)
            .ok_or_else(|| ProtocolError::UnknownPrompt(name.to_string()))
    }
}

/// A resource URI resolved against the registered resources and templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRoute {
    /// `users://all`
    AllUsers,
    /// `users://{userId}/profile`, carrying the raw `userId` segment
    UserProfile { user_id: String },
}

impl ResourceRoute {
    /// Match `uri` against `users://all` and `users://{userId}/profile`.
    ///
    /// The `userId` segment must be non-empty and contain no `/`; it is not
    /// required to be numeric here.
    pub fn parse(uri: &str) -> Option<Self> {
        if uri == ALL_USERS_URI {
            return Some(ResourceRoute::AllUsers);
        }

        let user_id = uri.strip_prefix("users://")?.strip_suffix("/profile")?;
        if user_id.is_empty() || user_id.contains('/') {
            return None;
        }

        Some(ResourceRoute::UserProfile {
            user_id: user_id.to_string(),
        })
    }
}

impl<R: UserRepository, C: SamplingClient> UserMcpServer<R, C> {
    /// Tool definitions for `tools/list`
    pub fn list_tools(&self) -> Vec<Value> {
        ToolName::ALL.into_iter().map(ToolName::definition).collect()
    }

    /// Resource definitions for `resources/list`
    ///
    /// Only the collection is listed; profiles are reachable through the
    /// template but not enumerable.
    pub fn list_resources(&self) -> Vec<Value> {
        vec![catalog::all_users_resource()]
    }

    /// Resource template definitions for `resources/templates/list`
    pub fn list_resource_templates(&self) -> Vec<Value> {
        vec![catalog::user_profile_template()]
    }

    /// Prompt definitions for `prompts/list`
    pub fn list_prompts(&self) -> Vec<Value> {
        PromptName::ALL
            .into_iter()
            .map(PromptName::definition)
            .collect()
    }

    /// Execute a tool by name with arguments
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::UnknownTool`] for an unregistered name
    /// - [`ProtocolError::InvalidInput`] when `create-user` arguments fail
    ///   the input schema
    ///
    /// Failures inside the handler are not errors; they come back as a
    /// normal result with a generic message.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ProtocolResult<CallToolResult> {
        debug!("Executing MCP tool: {} with args: {}", name, arguments);

        match name.parse::<ToolName>()? {
            ToolName::CreateUser => {
                let candidate =
                    codec::decode_arguments(&arguments).map_err(ProtocolError::InvalidInput)?;
                Ok(user_tools::handle_create_user(self, candidate).await)
            }
            ToolName::CreateRandomUser => Ok(user_tools::handle_create_random_user(self).await),
        }
    }

    /// Read a resource by URI
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ResourceNotFound`] when the URI matches neither the
    /// collection resource nor the profile template.
    pub async fn read_resource(&self, uri: &str) -> ProtocolResult<ReadResourceResult> {
        debug!("Reading MCP resource: {}", uri);

        let route = ResourceRoute::parse(uri).ok_or_else(|| ProtocolError::ResourceNotFound {
            uri: uri.to_string(),
        })?;

        Ok(match route {
            ResourceRoute::AllUsers => user_resources::handle_list_users(self, uri).await,
            ResourceRoute::UserProfile { user_id } => {
                user_resources::handle_user_profile(self, uri, &user_id).await
            }
        })
    }

    /// Render a prompt by name with arguments
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::UnknownPrompt`] for an unregistered name
    /// - [`ProtocolError::InvalidInput`] when a required argument is missing
    ///   or not a string
    pub fn get_prompt(&self, name: &str, arguments: &Value) -> ProtocolResult<GetPromptResult> {
        debug!("Rendering MCP prompt: {}", name);

        match name.parse::<PromptName>()? {
            PromptName::CreateFakeUser => {
                let user_name = arguments
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ProtocolError::InvalidInput(DirectoryError::invalid_input(
                            "name",
                            "required string",
                        ))
                    })?;
                Ok(user_prompts::handle_create_fake_user(user_name))
            }
        }
    }
}
