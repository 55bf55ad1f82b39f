//! Parameter key normalization, validation and default filling.
//!
//! Assistants mix naming conventions (`script_name`, `ScriptName`,
//! `SCRIPTNAME`). Incoming keys are rewritten to the tool's declared names
//! with plain lookups over the declared list:
//!
//! 1. exact match
//! 2. snake_case → camelCase exact match
//! 3. case-insensitive match
//! 4. case-insensitive match ignoring underscores
//!
//! Keys matching nothing are passed through untouched. A key supplied in the
//! exact declared casing always wins over a normalized duplicate.

use serde_json::{Map, Value};

use super::descriptor::ToolMetadata;
use crate::types::{Error, Result};

/// Convert `snake_case` to `camelCase`. Non-snake input is returned as-is.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for (i, ch) in key.chars().enumerate() {
        if ch == '_' && i > 0 {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn squash(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve one incoming key against the declared parameter names.
pub fn resolve_key<'a>(declared: &[&'a str], key: &str) -> Option<&'a str> {
    if let Some(exact) = declared.iter().find(|d| **d == key) {
        return Some(exact);
    }

    let camel = snake_to_camel(key);
    if let Some(found) = declared.iter().find(|d| **d == camel) {
        return Some(found);
    }

    if let Some(found) = declared.iter().find(|d| d.eq_ignore_ascii_case(key)) {
        return Some(found);
    }

    let squashed = squash(key);
    declared.iter().find(|d| squash(d) == squashed).copied()
}

/// Rewrite incoming keys to declared casing.
pub fn normalize_param_keys(declared: &[&str], params: Map<String, Value>) -> Map<String, Value> {
    let mut normalized = Map::new();
    let mut pending = Vec::new();

    for (key, value) in params {
        if declared.contains(&key.as_str()) {
            normalized.insert(key, value);
        } else {
            pending.push((key, value));
        }
    }

    for (key, value) in pending {
        match resolve_key(declared, &key) {
            Some(target) if !normalized.contains_key(target) => {
                tracing::trace!("param_key_normalized: {} -> {}", key, target);
                normalized.insert(target.to_string(), value);
            }
            _ => {
                normalized.insert(key, value);
            }
        }
    }

    normalized
}

/// Normalize a raw `params` value for a tool. `null` is treated as `{}`.
pub fn normalize_params(metadata: &ToolMetadata, params: Value) -> Result<Map<String, Value>> {
    let map = match params {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(Error::validation(format!(
                "Parameters for '{}' must be a JSON object, got {}",
                metadata.name,
                super::descriptor::value_type_name(&other)
            )))
        }
    };
    Ok(normalize_param_keys(&metadata.param_names(), map))
}

/// Check required parameters and declared types.
///
/// Returns a list of validation errors (empty = valid). Unknown keys are not
/// errors; they are forwarded to the engine as-is.
pub fn validate_params(metadata: &ToolMetadata, params: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    for param_def in &metadata.parameters {
        match params.get(&param_def.name) {
            None if param_def.is_required() => {
                errors.push(format!("Missing required parameter: {}", param_def.name));
            }
            None => {}
            Some(value) => {
                if let Err(e) = param_def.param_type.validate(value) {
                    errors.push(format!("Parameter '{}': {}", param_def.name, e));
                }
            }
        }
    }

    errors
}

/// Fill in default values for missing optional parameters.
pub fn fill_defaults(metadata: &ToolMetadata, params: &mut Map<String, Value>) {
    for param_def in &metadata.parameters {
        if !params.contains_key(&param_def.name) {
            if let Some(default) = &param_def.default {
                params.insert(param_def.name.clone(), default.clone());
            }
        }
    }
}

/// Fill defaults then validate; collapse errors into one validation error.
pub fn check_params(metadata: &ToolMetadata, params: &mut Map<String, Value>) -> Result<()> {
    fill_defaults(metadata, params);
    let errors = validate_params(metadata, params);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Invalid parameters for '{}': {}",
            metadata.name,
            errors.join("; ")
        )))
    }
}

// =============================================================================
// Tests
// =============================================================================
