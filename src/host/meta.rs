//! Meta tool handlers: activation, indirect invocation, search, statistics.

use serde_json::{json, Map, Value};

use super::ToolHost;
use crate::catalog::meta::{
    DISCOVER_AND_USE_TOOL, DISCOVER_AND_USE_TOOL_RAW, GET_TOOL_STATISTICS, REGISTER_CATEGORY,
    SEARCH_TOOLS, UNREGISTER_CATEGORY,
};
use crate::manager::response::{engine_reported_success, format_error};
use crate::manager::CallToolResult;
use crate::tools::{check_params, normalize_params};
use crate::types::{Error, Result};

fn string_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::validation(format!("'{}' must be a string", key)))
}

fn serialized<T: serde::Serialize>(value: &T, is_error: bool) -> CallToolResult {
    match serde_json::to_value(value) {
        Ok(v) => CallToolResult {
            is_error,
            ..CallToolResult::json(&v)
        },
        Err(e) => CallToolResult::error(format!("failed to serialize result: {}", e)),
    }
}

impl ToolHost {
    pub(super) async fn call_meta_tool(&mut self, name: &str, arguments: Value) -> CallToolResult {
        let args = match self.meta_arguments(name, arguments) {
            Ok(args) => args,
            Err(e) => return format_error(name, None, &e),
        };

        match self.dispatch_meta(name, args).await {
            Ok(result) => result,
            Err(e) => format_error(name, None, &e),
        }
    }

    fn meta_arguments(&self, name: &str, arguments: Value) -> Result<Map<String, Value>> {
        let definition = self
            .registry
            .get_tool(name)
            .ok_or_else(|| Error::not_found(format!("Tool '{}' not found", name)))?;
        let mut args = normalize_params(&definition.metadata, arguments)?;
        check_params(&definition.metadata, &mut args)?;
        Ok(args)
    }

    async fn dispatch_meta(&mut self, name: &str, args: Map<String, Value>) -> Result<CallToolResult> {
        tracing::debug!("meta_tool_called: tool={}", name);
        match name {
            REGISTER_CATEGORY => {
                let category = string_arg(&args, "category")?;
                let activation = self.manager.register_category(category);
                if activation.success {
                    self.tracker.record_category_loaded(category);
                }
                Ok(serialized(&activation, !activation.success))
            }
            UNREGISTER_CATEGORY => {
                let category = string_arg(&args, "category")?;
                let deactivation = self.manager.unregister_category(category);
                Ok(serialized(&deactivation, !deactivation.success))
            }
            DISCOVER_AND_USE_TOOL => {
                let tool_name = string_arg(&args, "toolName")?;
                let params = args.get("params").cloned().unwrap_or(Value::Null);
                Ok(self
                    .manager
                    .discover_and_use_tool(&mut self.tracker, tool_name, params)
                    .await)
            }
            DISCOVER_AND_USE_TOOL_RAW => {
                let tool_name = string_arg(&args, "toolName")?;
                let params = args.get("params").cloned().unwrap_or(Value::Null);
                let result = self
                    .manager
                    .discover_and_use_tool_raw(&mut self.tracker, tool_name, params)
                    .await;
                Ok(match result {
                    Ok(value) => serialized(&value, !engine_reported_success(&value)),
                    Err(e) => {
                        let category = self
                            .registry
                            .get_tool(tool_name)
                            .map(|d| d.category().to_string());
                        format_error(tool_name, category.as_deref(), &e)
                    }
                })
            }
            SEARCH_TOOLS => {
                let query = string_arg(&args, "query")?;
                let hits: Vec<Value> = self
                    .registry
                    .search_tools(query)
                    .into_iter()
                    .map(|m| {
                        json!({
                            "name": m.name,
                            "category": m.category,
                            "description": m.description,
                            "deprecated": m.deprecated,
                            "active": self.manager.is_active(&m.name),
                        })
                    })
                    .collect();
                Ok(CallToolResult::json(&json!({
                    "query": query,
                    "count": hits.len(),
                    "tools": hits,
                })))
            }
            GET_TOOL_STATISTICS => Ok(serialized(
                &json!({
                    "registry": self.registry.get_statistics(),
                    "active": self.manager.get_statistics(),
                    "workflow": self.tracker.snapshot(),
                }),
                false,
            )),
            other => Err(Error::not_found(format!("Meta tool '{}' has no handler", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::host;
    use crate::workflow::{WorkflowPhase, WorkflowPolicy};
    use serde_json::{json, Value};

    fn parse(result: &crate::manager::CallToolResult) -> Value {
        serde_json::from_str(&result.content[0].text).unwrap()
    }

    #[tokio::test]
    async fn test_register_category_marks_loaded() {
        let mut host = host(WorkflowPolicy::Block);
        let result = host
            .call_tool("register_category", json!({"category": "physics"}))
            .await;
        let body = parse(&result);
        assert_eq!(body["success"], true);
        assert_eq!(body["toolsRegistered"].as_array().unwrap().len(), 5);
        assert_eq!(
            host.tracker().phase(),
            WorkflowPhase::CategoryLoaded("physics".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_meta_category_rejected() {
        let mut host = host(WorkflowPolicy::Warn);
        let result = host
            .call_tool("register_category", json!({"category": "meta"}))
            .await;
        assert!(result.is_error);
        assert_eq!(parse(&result)["success"], false);
    }

    #[tokio::test]
    async fn test_missing_meta_argument_is_validation_error() {
        let mut host = host(WorkflowPolicy::Warn);
        let result = host.call_tool("register_category", json!({})).await;
        assert!(result.is_error);
        assert!(result.joined_text().contains("Missing required parameter: category"));
    }

    #[tokio::test]
    async fn test_discover_and_use_tool_accepts_snake_case_arguments() {
        let mut host = host(WorkflowPolicy::Warn);
        let result = host
            .call_tool(
                "discover_and_use_tool",
                json!({"tool_name": "save_scene", "params": {"scene_path": "Assets/Main.unity"}}),
            )
            .await;
        assert!(!result.is_error, "{}", result.joined_text());
        assert!(result.joined_text().contains("save_scene done"));
        assert!(result.joined_text().contains("Assets/Main.unity"));
    }

    #[tokio::test]
    async fn test_meta_chaining_rejected_for_every_meta_tool() {
        let mut host = host(WorkflowPolicy::Warn);
        for meta in crate::catalog::meta::tools() {
            for via in ["discover_and_use_tool", "discover_and_use_tool_raw"] {
                let result = host
                    .call_tool(via, json!({"toolName": meta.metadata.name, "params": {}}))
                    .await;
                assert!(result.is_error, "{} via {}", meta.metadata.name, via);
                assert!(result.joined_text().contains("misuse"));
            }
        }
        assert!(host.tracker().snapshot().tool_invocations.is_empty());
    }

    #[tokio::test]
    async fn test_raw_returns_structured_json() {
        let mut host = host(WorkflowPolicy::Warn);
        let result = host
            .call_tool(
                "discover_and_use_tool_raw",
                json!({"toolName": "get_scene_hierarchy", "params": {}}),
            )
            .await;
        let body = parse(&result);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["maxDepth"], 10);
    }

    #[tokio::test]
    async fn test_search_tools_reports_activity() {
        let mut host = host(WorkflowPolicy::Warn);
        host.call_tool("register_category", json!({"category": "ui"}))
            .await;
        let result = host
            .call_tool("search_tools", json!({"query": "text"}))
            .await;
        let body = parse(&result);
        let tools = body["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "create_text" && t["active"] == true));
        assert!(tools
            .iter()
            .any(|t| t["name"] == "create_legacy_text" && t["deprecated"] == true));
    }

    #[tokio::test]
    async fn test_statistics_sections() {
        let mut host = host(WorkflowPolicy::Warn);
        host.call_tool("register_category", json!({"category": "animation"}))
            .await;
        let body = parse(&host.call_tool("get_tool_statistics", json!({})).await);
        assert_eq!(body["active"]["totalActive"], 5);
        assert_eq!(body["registry"]["deprecatedCount"], 1);
        assert_eq!(body["workflow"]["policy"], "warn");
    }
}
