//! `resources/list`, `resources/templates/list` and `resources/read`.

use serde_json::{json, Value};

use crate::host::{resource_templates, ToolHost};
use crate::mcp::router::str_field;
use crate::types::Result;

pub fn list(host: &ToolHost) -> Result<Value> {
    Ok(json!({ "resources": host.list_resources() }))
}

pub fn templates() -> Result<Value> {
    Ok(json!({ "resourceTemplates": resource_templates() }))
}

pub fn read(host: &mut ToolHost, params: Value) -> Result<Value> {
    let uri = str_field(&params, "uri")?;
    let body = host.read_resource(&uri)?;
    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": "application/json",
            "text": serde_json::to_string_pretty(&body)?,
        }]
    }))
}
