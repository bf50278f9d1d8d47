//! Error types for user-directory operations.
//!
//! Errors are split by the layer that raises them. [`DirectoryError`] is the
//! business taxonomy seen by the tool, resource and prompt handlers, while
//! [`ProtocolError`] covers the dispatch-level failures that happen before any
//! handler logic runs (unknown names, arguments that fail the input schema).
//!
//! Handlers never let a [`DirectoryError`] escape: they convert it into a
//! normal, successfully returned payload carrying a short generic message.

use crate::sampling::SamplingError;
use crate::storage::StorageError;

/// Failures raised while turning sampled text into a user candidate.
///
/// Each variant names the pipeline stage that rejected the text, so that
/// callers and tests can tell a syntax problem from a shape problem.
#[derive(Debug, thiserror::Error)]
pub enum GeneratedDataError {
    /// The normalized text is not valid JSON.
    #[error("generated text is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The text parsed, but the value is not a JSON object.
    #[error("generated JSON is {found}, expected an object")]
    NotAnObject { found: &'static str },
}

/// Main error type for directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Explicit input failed the declared input schema
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Text produced by the host LLM could not be turned into a user
    #[error("Invalid generated data: {0}")]
    InvalidGeneratedData(#[from] GeneratedDataError),

    /// The host LLM returned no text content
    #[error("The host returned no text content")]
    EmptyGeneration,

    /// The sampling round trip itself failed
    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    /// The backing record collection could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DirectoryError {
    /// Shorthand for an [`DirectoryError::InvalidInput`] on a single field.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Dispatch-level errors, reported by the transport as protocol errors.
///
/// These are the only failures the protocol session ever observes; everything
/// that happens inside a handler is folded into the handler's payload instead.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// No tool is registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// No prompt is registered under this name
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    /// The URI matches neither a resource nor a resource template
    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },

    /// Arguments were rejected by the input schema check
    #[error("{0}")]
    InvalidInput(DirectoryError),
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Result type for protocol dispatch.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
