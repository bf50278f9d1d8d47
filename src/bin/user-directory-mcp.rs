//! User directory MCP server over stdio
//!
//! Reads JSON-RPC messages on stdin and writes responses on stdout. Logs go
//! to stderr so they never mix with protocol traffic.
//!
//! ## Usage
//!
//! ```bash
//! USER_DIRECTORY_DATA_FILE=./data/users.json RUST_LOG=debug cargo run --bin user-directory-mcp
//! ```
//!
//! ## Example MCP Messages
//!
//! ### Initialize the server:
//! ```json
//! {"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18","capabilities":{"sampling":{}},"clientInfo":{"name":"test-client","version":"1.0.0"}}}
//! ```
//!
//! ### Create a user:
//! ```json
//! {"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"create-user","arguments":{"name":"Ada Lovelace","email":"ada@example.com","address":"London","phone":"555-0100"}}}
//! ```
//!
//! ### Read every user:
//! ```json
//! {"jsonrpc":"2.0","id":3,"method":"resources/read","params":{"uri":"users://all"}}
//! ```

use log::info;
use user_directory::mcp_integration::stdio::serve_stdio;
use user_directory::{JsonFileStorage, ServerConfig, UserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        "Using data file {} (serialized writes: {})",
        config.data_file.display(),
        config.serialize_writes
    );

    let storage = JsonFileStorage::new(&config.data_file);
    let store = if config.serialize_writes {
        UserStore::serialized(storage)
    } else {
        UserStore::new(storage)
    };

    serve_stdio(store, &config).await?;

    info!("User directory MCP server shutdown complete");
    Ok(())
}
