//! Discovery metadata for MCP clients
//!
//! The definitions returned by `tools/list`, `resources/list`,
//! `resources/templates/list` and `prompts/list`. They are plain JSON values
//! built once per listing; the set of entries is fixed at compile time and
//! mirrors the closed name sets in [`protocol`](super::protocol).
//!
//! - [`tool_schemas`] - tool names, titles, input schemas and annotations
//! - [`resource_schemas`] - the collection resource and the profile template
//! - [`prompt_schemas`] - prompt names and their arguments

pub mod prompt_schemas;
pub mod resource_schemas;
pub mod tool_schemas;

pub use prompt_schemas::*;
pub use resource_schemas::*;
pub use tool_schemas::*;
