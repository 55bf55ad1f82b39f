//! Top-level MCP router - routes by method, delegates to handlers.

use serde_json::Value;

use crate::host::ToolHost;
use crate::mcp::handlers;
use crate::mcp::protocol::RpcError;
use crate::types::{Error, Result, ServerConfig};

/// Route one MCP request to its handler.
pub async fn route_request(
    host: &mut ToolHost,
    server: &ServerConfig,
    method: &str,
    params: Value,
) -> std::result::Result<Value, RpcError> {
    let result = match method {
        "initialize" => handlers::lifecycle::initialize(host, server, params),
        "ping" => Ok(serde_json::json!({})),
        "tools/list" => handlers::tools::list(host),
        "tools/call" => handlers::tools::call(host, params).await,
        "resources/list" => handlers::resources::list(host),
        "resources/templates/list" => handlers::resources::templates(),
        "resources/read" => handlers::resources::read(host, params),
        _ => return Err(RpcError::method_not_found(method)),
    };
    result.map_err(RpcError::from)
}

// =============================================================================
// Shared helpers - used by all handler modules
// =============================================================================

pub fn str_field(params: &Value, key: &str) -> Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("Missing required field: {}", key)))
}
