//! MCP (Model Context Protocol) integration for the user directory
//!
//! This module exposes the user store to AI agents as MCP tools, resources
//! and prompts. Agents can add users explicitly, ask the connected host model
//! to invent one, and read the collection or a single profile back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   AI Agent      │───▶│  MCP Protocol    │───▶│   UserStore     │
//! │   (Client)      │    │  (This Module)   │    │  (JSON file)    │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//!          ▲                        │
//!          └── sampling/createMessage ┘
//! ```
//!
//! ## Module Structure
//!
//! - `core` - Server type, discovery metadata and result payloads
//! - `protocol` - Name/URI resolution, discovery listings and dispatch
//! - `catalog/` - JSON definitions for tool, resource and prompt discovery
//! - `handlers/` - Tool, resource and prompt execution
//!   - `user_tools` - `create-user` and `create-random-user`
//!   - `user_resources` - `users://all` and `users://{userId}/profile`
//!   - `user_prompts` - `create-fake-user`
//! - `stdio` - JSON-RPC session over stdin/stdout (feature `stdio`)
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use user_directory::mcp_integration::UserMcpServer;
//! use user_directory::sampling::{SamplingClient, SamplingError, SamplingRequest, SamplingResponse};
//! use user_directory::storage::InMemoryStorage;
//! use user_directory::store::UserStore;
//!
//! struct Offline;
//!
//! impl SamplingClient for Offline {
//!     async fn create_message(&self, _: SamplingRequest) -> Result<SamplingResponse, SamplingError> {
//!         Err(SamplingError::Unsupported)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mcp_server = UserMcpServer::new(UserStore::new(InMemoryStorage::new()), Offline);
//!
//!     let listing = mcp_server.read_resource("users://all").await?;
//!     println!("{}", listing.contents[0].text);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod core;
pub mod handlers;
pub mod protocol;
#[cfg(feature = "stdio")]
pub mod stdio;

#[cfg(test)]
mod tests;

pub use core::{
    CallToolResult, Content, DEFAULT_SAMPLING_MAX_TOKENS, GetPromptResult, MIME_JSON, MIME_TEXT,
    McpServerInfo, PromptMessage, ReadResourceResult, ResourceContents, UserMcpServer,
};
pub use protocol::{PromptName, ResourceRoute, ToolName};
