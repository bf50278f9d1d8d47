//! Server configuration.
//!
//! [`ServerConfig`] collects everything the binary needs to assemble a
//! server: discovery metadata, where the user file lives, whether appends are
//! serialized, and the sampling output limit. Values start from
//! [`Default`] and can be overridden with setters or from the environment.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `USER_DIRECTORY_DATA_FILE` | `data_file` | `data/users.json` |
//! | `USER_DIRECTORY_SERIALIZE_WRITES` | `serialize_writes` | `true` |
//! | `USER_DIRECTORY_SAMPLING_MAX_TOKENS` | `sampling_max_tokens` | `1000` |

use crate::mcp_integration::{DEFAULT_SAMPLING_MAX_TOKENS, McpServerInfo};
use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "USER_DIRECTORY_DATA_FILE";
pub const ENV_SERIALIZE_WRITES: &str = "USER_DIRECTORY_SERIALIZE_WRITES";
pub const ENV_SAMPLING_MAX_TOKENS: &str = "USER_DIRECTORY_SAMPLING_MAX_TOKENS";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed for its field
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Configuration for the directory server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Metadata reported to clients at initialization.
    pub server_info: McpServerInfo,

    /// Location of the JSON file holding the user collection.
    pub data_file: PathBuf,

    /// Hold a single-writer lock across each append.
    pub serialize_writes: bool,

    /// Output limit for the `create-random-user` sampling request.
    pub sampling_max_tokens: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_info: McpServerInfo::default(),
            data_file: PathBuf::from("data/users.json"),
            serialize_writes: true,
            sampling_max_tokens: DEFAULT_SAMPLING_MAX_TOKENS,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// `lookup` returns the raw value for a variable name, or `None` when it
    /// is unset. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = get(ENV_DATA_FILE) {
            self.data_file = PathBuf::from(path);
        }
        if let Some(value) = get(ENV_SERIALIZE_WRITES) {
            self.serialize_writes = parse_bool(ENV_SERIALIZE_WRITES, &value)?;
        }
        if let Some(value) = get(ENV_SAMPLING_MAX_TOKENS) {
            self.sampling_max_tokens = match value.trim().parse::<u32>() {
                Ok(tokens) if tokens > 0 => tokens,
                _ => return Err(invalid(ENV_SAMPLING_MAX_TOKENS, &value)),
            };
        }

        Ok(self)
    }

    /// Set the data file location.
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Enable or disable serialized appends.
    pub fn with_serialize_writes(mut self, serialize: bool) -> Self {
        self.serialize_writes = serialize;
        self
    }

    /// Set the sampling output limit.
    pub fn with_sampling_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sampling_max_tokens = max_tokens;
        self
    }

    /// Set the discovery metadata.
    pub fn with_server_info(mut self, server_info: McpServerInfo) -> Self {
        self.server_info = server_info;
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
