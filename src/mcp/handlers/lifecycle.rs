//! Session handshake.

use serde_json::{json, Value};

use crate::host::ToolHost;
use crate::mcp::protocol::MCP_PROTOCOL_VERSION;
use crate::types::{Result, ServerConfig};

/// `initialize`: advertise capabilities and start a new workflow session.
pub fn initialize(host: &mut ToolHost, server: &ServerConfig, params: Value) -> Result<Value> {
    let client = params
        .get("clientInfo")
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    host.begin_session();
    tracing::info!(
        "mcp_session_initialized: client={} session={}",
        client,
        host.tracker().state().session_id
    );

    Ok(json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": true },
            "resources": {},
        },
        "serverInfo": {
            "name": server.name,
            "version": server.version,
        },
        "instructions": "Read unity://categories, then unity://categories/{category}, \
                         then call register_category before using a category's tools.",
    }))
}
