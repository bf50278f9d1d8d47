//! Resource and resource-template definitions for MCP discovery
//!
//! Only the collection resource is listed. Profiles are reachable through
//! the template but are never enumerated.

use crate::mcp_integration::core::MIME_JSON;
use serde_json::{Value, json};

/// URI of the full user collection.
pub const ALL_USERS_URI: &str = "users://all";
/// URI template of a single user profile.
pub const USER_PROFILE_TEMPLATE: &str = "users://{userId}/profile";

/// Definition of the `users://all` resource
pub fn all_users_resource() -> Value {
    json!({
        "uri": ALL_USERS_URI,
        "name": "users",
        "title": "Get all users",
        "description": "Retrieves all users from the system",
        "mimeType": MIME_JSON
    })
}

/// Definition of the `users://{userId}/profile` template
pub fn user_profile_template() -> Value {
    json!({
        "uriTemplate": USER_PROFILE_TEMPLATE,
        "name": "user details",
        "title": "User Profile",
        "description": "User Profile Details",
        "mimeType": MIME_JSON
    })
}
