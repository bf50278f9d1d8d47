//! Conversion of untrusted input into user candidates.
//!
//! Two entry points exist, one per tool:
//!
//! - [`decode_arguments`] checks the explicit `create-user` arguments against
//!   the declared input schema (four required strings, a syntactically valid
//!   email). The protocol layer runs it before the handler, so a rejection is
//!   an `InvalidInput` protocol error rather than a handler result.
//! - [`decode_generated_user`] turns free-form sampled text into a candidate
//!   through three independent stages:
//!
//! ```text
//! raw text ──normalize_generated_text──▶ &str ──parse_generated_json──▶ Value ──shape_generated_user──▶ NewUser
//!                                              (GeneratedDataError::Syntax)      (GeneratedDataError::NotAnObject)
//! ```
//!
//! Generated objects are only shape-checked, never validated: a missing field
//! becomes an empty string and a non-string scalar is kept as its JSON text.
//! The stored record is always the typed four-field [`NewUser`], not the
//! generated object passed through as-is. Keys other than the four user
//! fields are dropped, so a generated `id` can never override the assigned
//! one.

use crate::error::{DirectoryError, DirectoryResult, GeneratedDataError};
use crate::user::{EmailAddress, NewUser};
use serde_json::{Map, Value};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// The four user fields, in their declared order.
pub const USER_FIELDS: [&str; 4] = ["name", "email", "address", "phone"];

/// Validate explicit tool arguments and build a candidate.
///
/// # Errors
///
/// Returns [`DirectoryError::InvalidInput`] when the arguments are not an
/// object, a field is missing or not a string, or `email` is not a valid
/// address.
///
/// Only presence and type are checked. Empty strings are accepted for
/// `name`, `address` and `phone`.
pub fn decode_arguments(arguments: &Value) -> DirectoryResult<NewUser> {
    let object = arguments
        .as_object()
        .ok_or_else(|| DirectoryError::invalid_input("arguments", "expected an object"))?;

    let field = |name: &str| -> DirectoryResult<String> {
        match object.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(DirectoryError::invalid_input(
                name,
                format!("expected a string, got {}", json_kind(other)),
            )),
            None => Err(DirectoryError::invalid_input(name, "required")),
        }
    };

    let name = field("name")?;
    let email = EmailAddress::new(field("email")?)?;
    let address = field("address")?;
    let phone = field("phone")?;

    Ok(NewUser::new(name, email.into_inner(), address, phone))
}

/// Stage 1: strip surrounding whitespace and an optional fenced code block.
///
/// The opening marker is removed only when the trimmed text starts with
/// exactly ```` ```json ```` (case-sensitive); the closing marker only when it
/// ends with ```` ``` ````. The result is trimmed again.
pub fn normalize_generated_text(raw: &str) -> &str {
    let text = raw.trim();
    let text = text.strip_prefix(FENCE_OPEN).unwrap_or(text);
    let text = text.strip_suffix(FENCE_CLOSE).unwrap_or(text);
    text.trim()
}

/// Stage 2: structural parse of normalized text.
pub fn parse_generated_json(text: &str) -> Result<Value, GeneratedDataError> {
    Ok(serde_json::from_str(text)?)
}

/// Stage 3: require an object and project it onto the user fields.
pub fn shape_generated_user(value: Value) -> Result<NewUser, GeneratedDataError> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(GeneratedDataError::NotAnObject {
                found: json_kind(&other),
            });
        }
    };

    Ok(NewUser {
        name: field_text(&object, "name"),
        email: field_text(&object, "email"),
        address: field_text(&object, "address"),
        phone: field_text(&object, "phone"),
    })
}

/// Run all three stages on sampled text.
pub fn decode_generated_user(raw: &str) -> Result<NewUser, GeneratedDataError> {
    let value = parse_generated_json(normalize_generated_text(raw))?;
    shape_generated_user(value)
}

fn field_text(object: &Map<String, Value>, name: &str) -> String {
    match object.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
