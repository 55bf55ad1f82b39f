//! Discovery resources: category overview, category detail, tool detail.
//!
//! Every successful read is recorded with the usage tracker.

use serde_json::{json, Value};

use super::ToolHost;
use crate::tools::META_CATEGORY;
use crate::types::{Error, Result};
use crate::workflow::ResourceAccess;

pub const CATEGORIES_URI: &str = "unity://categories";
pub const CATEGORY_URI_PREFIX: &str = "unity://categories/";
pub const TOOL_URI_PREFIX: &str = "unity://tools/";

/// `resources/templates/list` entries.
pub fn resource_templates() -> Vec<Value> {
    vec![
        json!({
            "uriTemplate": format!("{}{{category}}", CATEGORY_URI_PREFIX),
            "name": "Category detail",
            "description": "Full metadata for every tool in one category",
            "mimeType": "application/json",
        }),
        json!({
            "uriTemplate": format!("{}{{name}}", TOOL_URI_PREFIX),
            "name": "Tool detail",
            "description": "Description and parameter schema for one tool",
            "mimeType": "application/json",
        }),
    ]
}

impl ToolHost {
    /// `resources/list` entries: the overview plus one per category.
    pub fn list_resources(&self) -> Vec<Value> {
        let mut resources = vec![json!({
            "uri": CATEGORIES_URI,
            "name": "Tool categories",
            "description": "Overview of tool categories. Start discovery here.",
            "mimeType": "application/json",
        })];
        for category in self.engine_categories() {
            resources.push(json!({
                "uri": format!("{}{}", CATEGORY_URI_PREFIX, category),
                "name": format!("{} tools", category),
                "description": self.registry.category_description(&category).unwrap_or_default(),
                "mimeType": "application/json",
            }));
        }
        resources
    }

    /// Read a discovery resource by URI.
    pub fn read_resource(&mut self, uri: &str) -> Result<Value> {
        if uri == CATEGORIES_URI {
            let body = self.categories_overview();
            self.tracker.record_resource_access(ResourceAccess::Overview);
            return Ok(body);
        }

        if let Some(category) = uri.strip_prefix(CATEGORY_URI_PREFIX) {
            let body = self.category_detail(category)?;
            self.tracker
                .record_resource_access(ResourceAccess::CategoryDetail(category.to_string()));
            return Ok(body);
        }

        if let Some(name) = uri.strip_prefix(TOOL_URI_PREFIX) {
            let body = self.tool_detail(name)?;
            self.tracker
                .record_resource_access(ResourceAccess::ToolDetail(name.to_string()));
            return Ok(body);
        }

        Err(Error::not_found(format!("Unknown resource: {}", uri)))
    }

    fn engine_categories(&self) -> Vec<String> {
        self.registry
            .get_categories()
            .into_iter()
            .filter(|c| c != META_CATEGORY)
            .collect()
    }

    fn categories_overview(&self) -> Value {
        let categories: Vec<Value> = self
            .engine_categories()
            .into_iter()
            .map(|name| {
                json!({
                    "name": name,
                    "description": self.registry.category_description(&name).unwrap_or_default(),
                    "toolCount": self.registry.get_tools_by_category(&name).len(),
                    "active": self.manager.active_categories().contains(&name),
                })
            })
            .collect();

        json!({
            "categories": categories,
            "next": format!(
                "Read {}{{category}} for tool details, then call register_category to activate it.",
                CATEGORY_URI_PREFIX
            ),
        })
    }

    fn category_detail(&self, category: &str) -> Result<Value> {
        let definitions = self.registry.get_tools_by_category(category);
        if definitions.is_empty() {
            return Err(Error::not_found(format!(
                "Unknown category '{}'. Read {} for the list",
                category, CATEGORIES_URI
            )));
        }

        let tools = definitions
            .iter()
            .map(|d| -> Result<Value> {
                let mut detail = d.metadata.to_detail()?;
                if let Some(obj) = detail.as_object_mut() {
                    obj.insert("active".to_string(), json!(self.manager.is_active(d.name())));
                }
                Ok(detail)
            })
            .collect::<Result<Vec<Value>>>()?;

        Ok(json!({
            "category": category,
            "description": self.registry.category_description(category).unwrap_or_default(),
            "toolCount": tools.len(),
            "tools": tools,
        }))
    }

    fn tool_detail(&self, name: &str) -> Result<Value> {
        let definition = self.registry.get_tool(name).ok_or_else(|| {
            Error::not_found(format!(
                "Unknown tool '{}'. Read {} to discover tools",
                name, CATEGORIES_URI
            ))
        })?;
        let mut detail = definition.metadata.to_detail()?;
        if let Some(obj) = detail.as_object_mut() {
            obj.insert("active".to_string(), json!(self.manager.is_active(name)));
            obj.insert("signature".to_string(), json!(definition.metadata.signature()));
        }
        Ok(detail)
    }
}
