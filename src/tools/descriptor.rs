//! Tool descriptors - typed metadata, parameter definitions, handlers.
//!
//! Descriptors are pure data: reading a tool's name, category or schema never
//! requires constructing the tool. Runtime behavior lives in [`ToolHandler`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::types::{Error, Result};

/// Category holding the discovery/activation tools themselves.
pub const META_CATEGORY: &str = "meta";

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Int,
    Float,
    Bool,
    StringList,
    NumberList,
    Object,
    Enum(Vec<String>),
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            ParamType::String => expect_type(value.is_string(), "string", value),
            ParamType::Int => expect_type(value.is_i64() || value.is_u64(), "integer", value),
            ParamType::Float => expect_type(value.is_number(), "number", value),
            ParamType::Bool => expect_type(value.is_boolean(), "boolean", value),
            ParamType::Object => expect_type(value.is_object(), "object", value),
            ParamType::StringList => validate_list(value, "string", Value::is_string),
            ParamType::NumberList => validate_list(value, "number", Value::is_number),
            ParamType::Enum(variants) => {
                if let Some(s) = value.as_str() {
                    if variants.iter().any(|v| v == s) {
                        Ok(())
                    } else {
                        Err(format!(
                            "invalid enum value '{}', expected one of: {}",
                            s,
                            variants.join(", ")
                        ))
                    }
                } else {
                    Err(format!("expected string for enum, got {}", value_type_name(value)))
                }
            }
            ParamType::Optional(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.validate(value)
                }
            }
        }
    }

    /// Human-readable type name for listings.
    pub fn display_name(&self) -> String {
        match self {
            ParamType::String => "string".to_string(),
            ParamType::Int => "integer".to_string(),
            ParamType::Float => "number".to_string(),
            ParamType::Bool => "boolean".to_string(),
            ParamType::StringList => "string[]".to_string(),
            ParamType::NumberList => "number[]".to_string(),
            ParamType::Object => "object".to_string(),
            ParamType::Enum(variants) => format!("enum({})", variants.join("|")),
            ParamType::Optional(inner) => format!("{}?", inner.display_name()),
        }
    }

    /// JSON Schema fragment for this type.
    pub fn json_schema(&self) -> Value {
        match self {
            ParamType::String => json!({"type": "string"}),
            ParamType::Int => json!({"type": "integer"}),
            ParamType::Float => json!({"type": "number"}),
            ParamType::Bool => json!({"type": "boolean"}),
            ParamType::Object => json!({"type": "object"}),
            ParamType::StringList => json!({"type": "array", "items": {"type": "string"}}),
            ParamType::NumberList => json!({"type": "array", "items": {"type": "number"}}),
            ParamType::Enum(variants) => json!({"type": "string", "enum": variants}),
            ParamType::Optional(inner) => inner.json_schema(),
        }
    }
}

fn expect_type(ok: bool, expected: &str, value: &Value) -> std::result::Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("expected {}, got {}", expected, value_type_name(value)))
    }
}

fn validate_list(
    value: &Value,
    item_name: &str,
    check: fn(&Value) -> bool,
) -> std::result::Result<(), String> {
    let arr = value
        .as_array()
        .ok_or_else(|| format!("expected array, got {}", value_type_name(value)))?;
    for (i, item) in arr.iter().enumerate() {
        if !check(item) {
            return Err(format!(
                "expected {} at index {}, got {}",
                item_name,
                i,
                value_type_name(item)
            ));
        }
    }
    Ok(())
}

pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            default: None,
        }
    }

    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self::required(name, ParamType::Optional(Box::new(param_type)), description)
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !matches!(self.param_type, ParamType::Optional(_))
    }
}

// =============================================================================
// Tool metadata
// =============================================================================

/// Immutable metadata for one tool. Primary key is `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub category: String,
    pub version: String,
    pub deprecated: bool,
    pub tags: Vec<String>,
    /// Executes entirely inside this process; never contacts the engine.
    pub server_only: bool,
    pub parameters: Vec<ParamDef>,
}

impl ToolMetadata {
    pub fn new(name: &str, category: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            version: "1.0.0".to_string(),
            deprecated: false,
            tags: Vec::new(),
            server_only: false,
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamDef) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn is_meta(&self) -> bool {
        self.category == META_CATEGORY
    }

    /// Declared parameter names, in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Check structural soundness of the descriptor.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Tool name cannot be empty"));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(Error::validation(format!(
                "Tool name '{}' cannot contain whitespace",
                self.name
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::validation(format!(
                "Tool '{}' has an empty category",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(Error::validation(format!(
                    "Tool '{}' declares parameter '{}' twice",
                    self.name, param.name
                )));
            }
        }
        Ok(())
    }

    /// JSON Schema for the tool's input object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut schema = param.param_type.json_schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".to_string(), json!(param.description));
                if let Some(default) = &param.default {
                    obj.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(param.name.clone(), schema);
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Entry for an MCP `tools/list` response.
    pub fn to_tool_listing(&self) -> Value {
        let description = if self.deprecated {
            format!("[DEPRECATED] {}", self.description)
        } else {
            self.description.clone()
        };
        json!({
            "name": self.name,
            "description": description,
            "inputSchema": self.input_schema(),
        })
    }

    /// Full detail, as served by the tool detail resource.
    pub fn to_detail(&self) -> Result<Value> {
        let mut detail = serde_json::to_value(self)?;
        if let Some(obj) = detail.as_object_mut() {
            obj.insert("inputSchema".to_string(), self.input_schema());
        }
        Ok(detail)
    }

    /// One-line signature: `name(param: type, opt?: type): description`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let optional = if p.is_required() { "" } else { "?" };
                format!("{}{}: {}", p.name, optional, p.param_type.display_name())
            })
            .collect();
        format!("{}({}): {}", self.name, params.join(", "), self.description)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// A tool implemented inside this process.
#[async_trait]
pub trait LocalTool: Send + Sync {
    async fn execute(&self, params: Value) -> Result<Value>;
}

/// How an activated tool runs.
#[derive(Clone)]
pub enum ToolHandler {
    /// Dispatched to the editor through the engine bridge.
    Engine,
    /// Runs in this process.
    Local(Arc<dyn LocalTool>),
    /// Discovery/activation tool served by the host itself.
    Meta,
}

impl ToolHandler {
    pub fn is_server_only(&self) -> bool {
        !matches!(self, ToolHandler::Engine)
    }
}

impl fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolHandler::Engine => f.write_str("Engine"),
            ToolHandler::Local(_) => f.write_str("Local(..)"),
            ToolHandler::Meta => f.write_str("Meta"),
        }
    }
}

/// Metadata plus the handler that runs it.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub metadata: Arc<ToolMetadata>,
    pub handler: ToolHandler,
}

impl ToolDefinition {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn category(&self) -> &str {
        &self.metadata.category
    }
}

/// Bind metadata to a handler. `server_only` follows the handler kind.
pub fn define_tool(mut metadata: ToolMetadata, handler: ToolHandler) -> ToolDefinition {
    metadata.server_only = handler.is_server_only();
    ToolDefinition {
        metadata: Arc::new(metadata),
        handler,
    }
}

// =============================================================================
// Tests
// =============================================================================
