//! Tool definitions for MCP discovery
//!
//! `create-user` declares the four required string fields; its `email`
//! property carries `"format": "email"`, which the input check enforces
//! before the handler runs. `create-random-user` takes no input and is
//! annotated as a non-idempotent, open-world write.

use serde_json::{Value, json};

/// Definition of the `create-user` tool
pub fn create_user_tool() -> Value {
    json!({
        "name": "create-user",
        "title": "Create User",
        "description": "Creates a new user in the system",
        "inputSchema": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Full name of the user"
                },
                "email": {
                    "type": "string",
                    "format": "email",
                    "description": "Email address of the user"
                },
                "address": {
                    "type": "string",
                    "description": "Postal address of the user"
                },
                "phone": {
                    "type": "string",
                    "description": "Phone number of the user"
                }
            },
            "required": ["name", "email", "address", "phone"]
        }
    })
}

/// Definition of the `create-random-user` tool
pub fn create_random_user_tool() -> Value {
    json!({
        "name": "create-random-user",
        "title": "Create Random User",
        "description": "Generates a random user with realistic details",
        "inputSchema": {
            "type": "object",
            "properties": {}
        },
        "annotations": {
            "readOnlyHint": false,
            "idempotentHint": false,
            "openWorldHint": true,
            "destructiveHint": false
        }
    })
}
