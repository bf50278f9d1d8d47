//! Prompt handlers

use crate::mcp_integration::core::{Content, GetPromptResult, PromptMessage};
use crate::sampling::Role;

/// Build the `create-fake-user` template for `name`
pub fn handle_create_fake_user(name: &str) -> GetPromptResult {
    GetPromptResult {
        description: Some("Creates a fake user with a given name".to_string()),
        messages: vec![PromptMessage {
            role: Role::User,
            content: Content::text(format!(
                "Create a fake user with the name {name}. The user should have given name \
                 and realistic other details"
            )),
        }],
    }
}
