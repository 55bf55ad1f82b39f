//! User-facing tool results and error guidance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Error;

/// One content block of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// MCP `tools/call` result: `{content: [{type: "text", text}], isError}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// Pretty-printed JSON as a text result.
    pub fn json(value: &Value) -> Self {
        Self::text(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
    }

    /// Concatenated text of all blocks.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Insert a block ahead of the existing content.
    pub fn prepend(mut self, text: impl Into<String>) -> Self {
        self.content.insert(
            0,
            ContentBlock {
                kind: "text".to_string(),
                text: text.into(),
            },
        );
        self
    }
}

/// `false` only when the engine explicitly reported `success: false`.
pub fn engine_reported_success(result: &Value) -> bool {
    result
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

/// Render a successful engine/local result.
pub fn format_success(tool_name: &str, category: &str, result: &Value) -> CallToolResult {
    let message = result.get("message").and_then(Value::as_str);
    let mut text = match message {
        Some(message) => format!("✓ {}: {}", tool_name, message),
        None => format!("✓ {} completed", tool_name),
    };

    match result.get("data") {
        Some(data) if !data.is_null() => {
            text.push_str("\n\nData:\n");
            text.push_str(&serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()));
        }
        None if message.is_none() && !result.is_null() && !result.is_boolean() => {
            text.push_str("\n\n");
            text.push_str(&serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string()));
        }
        _ => {}
    }

    text.push_str(&format!(
        "\n\nWorkflow: more '{}' tools are listed at unity://categories/{}; \
         inactive categories can be activated with register_category.",
        category, category
    ));
    CallToolResult::text(text)
}

/// Render an engine-reported failure (`success: false`).
pub fn format_engine_failure(tool_name: &str, result: &Value) -> CallToolResult {
    let message = result
        .get("message")
        .or_else(|| result.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("the editor reported a failure");
    CallToolResult::error(format!(
        "✗ {} failed: {}\n\nHint: {}",
        tool_name,
        message,
        tool_detail_hint(tool_name)
    ))
}

/// Render an error with an actionable hint.
///
/// `category` is the tool's category when the tool is known.
pub fn format_error(tool_name: &str, category: Option<&str>, error: &Error) -> CallToolResult {
    let hint = match (error, category) {
        (Error::NotFound(_), _) => "Read unity://categories to see every category, then \
             unity://categories/{category} to list its tools."
            .to_string(),
        (Error::Validation(_), _) => tool_detail_hint(tool_name),
        (Error::WorkflowViolation(_), Some(category)) => format!(
            "Read unity://categories/{} (or call register_category with \"{}\") first.",
            category, category
        ),
        (Error::Misuse(_), _) => {
            "Meta tools (register_category, search_tools, ...) must be called directly, \
             not through discover_and_use_tool."
                .to_string()
        }
        (Error::Engine(_) | Error::Timeout(_), _) => {
            "Check that the Unity editor is running with the MCP bridge plugin enabled and \
             reachable at the configured engine address."
                .to_string()
        }
        (_, Some(category)) => format!(
            "Read unity://categories/{} for the tools and parameters available.",
            category
        ),
        _ => "Read unity://categories to start discovery.".to_string(),
    };

    CallToolResult::error(format!("✗ {}: {}\n\nHint: {}", tool_name, error, hint))
}

fn tool_detail_hint(tool_name: &str) -> String {
    format!(
        "Read unity://tools/{} for the full parameter schema.",
        tool_name
    )
}
