//! MCP integration handlers
//!
//! One module per surface. Every handler returns a protocol payload and
//! never an error: failures are logged with their cause and replaced by a
//! short, generic message before they reach the client.

pub mod user_prompts;
pub mod user_resources;
pub mod user_tools;

pub use user_prompts::*;
pub use user_resources::*;
pub use user_tools::*;
