//! JSON-RPC 2.0 message types for the stdio transport.
//!
//! The session is bidirectional: the client sends requests and
//! notifications, and also answers the server's own `sampling/createMessage`
//! requests. [`IncomingMessage::parse`] sorts a line into one of those three
//! shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard JSON-RPC and MCP error codes.
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// MCP: the requested resource does not exist.
    pub const RESOURCE_NOT_FOUND: i32 = -32002;
}

const JSONRPC_VERSION: &str = "2.0";

/// Request ID can be a number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric ID.
    Number(i64),
    /// String ID.
    String(String),
}

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 notification (no id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC 2.0 error response.
///
/// `id` is `null` when the offending message could not be read far enough
/// to recover its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    pub error: JsonRpcError,
}

/// Anything the server writes back for a request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcOutput {
    Success(JsonRpcResponse),
    Error(JsonRpcErrorResponse),
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC 2.0 request.
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

impl JsonRpcOutput {
    /// Creates a success response.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Success(JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        })
    }

    /// Creates an error response.
    pub fn error(id: Option<RequestId>, code: i32, message: impl Into<String>) -> Self {
        Self::error_with_data(id, code, message, None)
    }

    /// Creates an error response carrying structured data.
    pub fn error_with_data(
        id: Option<RequestId>,
        code: i32,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self::Error(JsonRpcErrorResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcError {
                code,
                message: message.into(),
                data,
            },
        })
    }

    /// Serialize to a single JSON line (without the newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why a line could not be read as a JSON-RPC message.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The line is not JSON.
    #[error("parse error: {0}")]
    Parse(String),
    /// The line is JSON but not a request, notification or response.
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl MessageError {
    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            MessageError::Parse(_) => error_codes::PARSE_ERROR,
            MessageError::Invalid(_) => error_codes::INVALID_REQUEST,
        }
    }
}

/// A message received from the client.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// Client request; needs a response.
    Request(JsonRpcRequest),
    /// Client notification; must not be answered.
    Notification(JsonRpcNotification),
    /// Client answer to one of the server's own requests.
    Response {
        id: RequestId,
        outcome: Result<Value, JsonRpcError>,
    },
}

impl IncomingMessage {
    /// Classify one line of input.
    pub fn parse(line: &str) -> Result<Self, MessageError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| MessageError::Parse(e.to_string()))?;
        let invalid = |e: serde_json::Error| MessageError::Invalid(e.to_string());

        let object = value
            .as_object()
            .ok_or_else(|| MessageError::Invalid("expected a JSON object".to_string()))?;
        let has_method = object.contains_key("method");
        let has_id = object.get("id").is_some_and(|id| !id.is_null());

        if has_method && has_id {
            return serde_json::from_value(value)
                .map(IncomingMessage::Request)
                .map_err(invalid);
        }
        if has_method {
            return serde_json::from_value(value)
                .map(IncomingMessage::Notification)
                .map_err(invalid);
        }
        if !has_id {
            return Err(MessageError::Invalid(
                "message has neither a method nor an id".to_string(),
            ));
        }

        let id: RequestId = serde_json::from_value(object["id"].clone()).map_err(invalid)?;
        let outcome = match (object.get("result"), object.get("error")) {
            (_, Some(error)) => Err(serde_json::from_value(error.clone()).map_err(invalid)?),
            (Some(result), None) => Ok(result.clone()),
            (None, None) => {
                return Err(MessageError::Invalid(
                    "response has neither a result nor an error".to_string(),
                ));
            }
        };

        Ok(IncomingMessage::Response { id, outcome })
    }
}
