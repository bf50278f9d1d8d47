//! Routes client requests to the directory server.
//!
//! Every method produces exactly one [`JsonRpcOutput`]. Protocol-level
//! failures become JSON-RPC errors; failures inside tools and resources are
//! already folded into normal results by the handlers.

use super::jsonrpc::{JsonRpcOutput, JsonRpcRequest, RequestId, error_codes};
use crate::error::ProtocolError;
use crate::mcp_integration::core::UserMcpServer;
use crate::sampling::SamplingClient;
use crate::storage::UserRepository;
use log::{debug, warn};
use serde::Deserialize;
use serde::Serialize;
use serde_json::{Value, json};

/// Newest protocol revision this server speaks.
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// Revisions accepted from the client; anything else is answered with
/// [`LATEST_PROTOCOL_VERSION`].
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
    #[serde(default)]
    capabilities: Value,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// Whether `initialize` params advertise the sampling capability.
pub fn client_supports_sampling(params: Option<&Value>) -> bool {
    params
        .and_then(|p| p.get("capabilities"))
        .and_then(|c| c.get("sampling"))
        .is_some_and(|s| !s.is_null())
}

/// Handle one client request.
pub async fn dispatch<R, C>(server: &UserMcpServer<R, C>, request: &JsonRpcRequest) -> JsonRpcOutput
where
    R: UserRepository,
    C: SamplingClient,
{
    let id = request.id.clone();
    debug!("Dispatching {} ({:?})", request.method, id);

    match request.method.as_str() {
        "initialize" => initialize(server, id, request.params.as_ref()),
        "ping" => JsonRpcOutput::success(id, json!({})),
        "tools/list" => JsonRpcOutput::success(id, json!({ "tools": server.list_tools() })),
        "resources/list" => {
            JsonRpcOutput::success(id, json!({ "resources": server.list_resources() }))
        }
        "resources/templates/list" => JsonRpcOutput::success(
            id,
            json!({ "resourceTemplates": server.list_resource_templates() }),
        ),
        "prompts/list" => JsonRpcOutput::success(id, json!({ "prompts": server.list_prompts() })),
        "tools/call" => {
            let params: CallToolParams = match decode_params(&id, request.params.as_ref()) {
                Ok(params) => params,
                Err(output) => return output,
            };
            let arguments = params.arguments.unwrap_or_else(|| json!({}));
            respond(id, server.call_tool(&params.name, arguments).await)
        }
        "resources/read" => {
            let params: ReadResourceParams = match decode_params(&id, request.params.as_ref()) {
                Ok(params) => params,
                Err(output) => return output,
            };
            respond(id, server.read_resource(&params.uri).await)
        }
        "prompts/get" => {
            let params: GetPromptParams = match decode_params(&id, request.params.as_ref()) {
                Ok(params) => params,
                Err(output) => return output,
            };
            let arguments = params.arguments.unwrap_or_else(|| json!({}));
            respond(id, server.get_prompt(&params.name, &arguments))
        }
        other => {
            warn!("Unknown method: {}", other);
            JsonRpcOutput::error(
                Some(id),
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )
        }
    }
}

fn initialize<R, C>(
    server: &UserMcpServer<R, C>,
    id: RequestId,
    params: Option<&Value>,
) -> JsonRpcOutput
where
    R: UserRepository,
    C: SamplingClient,
{
    let params: InitializeParams = match params {
        Some(p) => match serde_json::from_value(p.clone()) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcOutput::error(
                    Some(id),
                    error_codes::INVALID_PARAMS,
                    format!("invalid initialize params: {e}"),
                );
            }
        },
        None => InitializeParams::default(),
    };

    let protocol_version = params
        .protocol_version
        .as_deref()
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(LATEST_PROTOCOL_VERSION);
    debug!(
        "Client capabilities: {}, negotiated protocol {}",
        params.capabilities, protocol_version
    );

    let info = server.server_info();
    let mut result = json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false },
            "resources": { "subscribe": false, "listChanged": false },
            "prompts": { "listChanged": false }
        },
        "serverInfo": { "name": info.name, "version": info.version }
    });
    if let Some(instructions) = &info.instructions {
        result["instructions"] = json!(instructions);
    }

    JsonRpcOutput::success(id, result)
}

fn decode_params<T>(id: &RequestId, params: Option<&Value>) -> Result<T, JsonRpcOutput>
where
    T: for<'de> Deserialize<'de>,
{
    let value = params.cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        JsonRpcOutput::error(
            Some(id.clone()),
            error_codes::INVALID_PARAMS,
            format!("invalid params: {e}"),
        )
    })
}

fn respond<T: Serialize>(id: RequestId, result: Result<T, ProtocolError>) -> JsonRpcOutput {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => JsonRpcOutput::success(id, value),
            Err(e) => JsonRpcOutput::error(Some(id), error_codes::INTERNAL_ERROR, e.to_string()),
        },
        Err(ProtocolError::ResourceNotFound { uri }) => JsonRpcOutput::error_with_data(
            Some(id),
            error_codes::RESOURCE_NOT_FOUND,
            format!("Resource not found: {uri}"),
            Some(json!({ "uri": uri })),
        ),
        Err(e) => JsonRpcOutput::error(Some(id), error_codes::INVALID_PARAMS, e.to_string()),
    }
}
