//! User directory MCP server library for Rust.
//!
//! Maintains a persistent collection of user records and exposes it to AI
//! agents over the Model Context Protocol: two tools to create users (one
//! from explicit fields, one by asking the host model to invent the data),
//! two resources to read them back, and one prompt template.
//!
//! # Core Components
//!
//! - [`UserMcpServer`] - Tool, resource and prompt surface
//! - [`UserStore`] - Id assignment and lookups over a repository
//! - [`UserRepository`] - Trait for implementing storage backends
//! - [`SamplingClient`] - Channel to the host model
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use user_directory::{JsonFileStorage, ServerConfig, UserStore};
//!
//! # #[cfg(feature = "stdio")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let store = UserStore::serialized(JsonFileStorage::new(&config.data_file));
//! user_directory::mcp_integration::stdio::serve_stdio(store, &config).await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod mcp_integration;
pub mod sampling;
pub mod storage;
pub mod store;
pub mod user;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{
    DirectoryError, DirectoryResult, GeneratedDataError, ProtocolError, ProtocolResult,
};
pub use mcp_integration::{McpServerInfo, UserMcpServer};
pub use sampling::{SamplingClient, SamplingError, SamplingRequest, SamplingResponse};
pub use storage::{InMemoryStorage, JsonFileStorage, StorageError, UserRepository};
pub use store::UserStore;
pub use user::{EmailAddress, NewUser, User};
