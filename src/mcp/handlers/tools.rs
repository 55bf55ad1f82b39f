//! `tools/list` and `tools/call`.

use serde_json::{json, Value};

use crate::host::ToolHost;
use crate::mcp::router::str_field;
use crate::types::Result;

pub fn list(host: &ToolHost) -> Result<Value> {
    let tools: Vec<Value> = host
        .list_tools()
        .iter()
        .map(|m| m.to_tool_listing())
        .collect();
    Ok(json!({ "tools": tools }))
}

pub async fn call(host: &mut ToolHost, params: Value) -> Result<Value> {
    let name = str_field(&params, "name")?;
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let result = host.call_tool(&name, arguments).await;
    Ok(serde_json::to_value(result)?)
}
