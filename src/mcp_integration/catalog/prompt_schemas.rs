//! Prompt definitions for MCP discovery

use serde_json::{Value, json};

/// Definition of the `create-fake-user` prompt
pub fn create_fake_user_prompt() -> Value {
    json!({
        "name": "create-fake-user",
        "title": "Create Fake User",
        "description": "Creates a fake user with a given name",
        "arguments": [
            {
                "name": "name",
                "description": "Name the fake user should have",
                "required": true
            }
        ]
    })
}
