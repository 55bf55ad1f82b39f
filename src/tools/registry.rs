//! Tool registry - process-wide catalog of tool definitions and categories.
//!
//! Populated once at startup, then shared read-only behind an `Arc`. Lookups
//! never fail on missing entries; they return empty/none.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::descriptor::{ToolDefinition, ToolMetadata};
use crate::types::Result;

/// Registry-wide statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStatistics {
    pub total_tools: usize,
    pub category_count: usize,
    pub per_category: BTreeMap<String, usize>,
    pub deprecated_count: usize,
}

/// Catalog: tool name → definition, category → tool names.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
    categories: HashMap<String, BTreeSet<String>>,
    category_info: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool definition. Last write wins on re-registration.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<()> {
        definition.metadata.validate()?;

        let name = definition.name().to_string();
        let category = definition.category().to_string();

        if let Some(previous) = self.tools.get(&name) {
            if previous.category() != category {
                let old_category = previous.category().to_string();
                if let Some(names) = self.categories.get_mut(&old_category) {
                    names.remove(&name);
                    if names.is_empty() {
                        self.categories.remove(&old_category);
                    }
                }
            }
        }

        self.categories
            .entry(category)
            .or_default()
            .insert(name.clone());
        self.tools.insert(name, definition);
        Ok(())
    }

    /// Register many definitions; failures are logged and skipped.
    ///
    /// Returns the number registered.
    pub fn register_all(&mut self, definitions: impl IntoIterator<Item = ToolDefinition>) -> usize {
        let mut registered = 0;
        for definition in definitions {
            let name = definition.name().to_string();
            match self.register(definition) {
                Ok(()) => registered += 1,
                Err(e) => {
                    tracing::warn!("tool_registration_skipped: tool={:?} error={}", name, e);
                }
            }
        }
        registered
    }

    /// Attach a human-readable description to a category.
    pub fn describe_category(&mut self, category: &str, description: &str) {
        self.category_info
            .insert(category.to_string(), description.to_string());
    }

    pub fn category_description(&self, category: &str) -> Option<&str> {
        self.category_info.get(category).map(String::as_str)
    }

    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Definitions in one category, sorted by name. Unknown category → empty.
    pub fn get_tools_by_category(&self, category: &str) -> Vec<&ToolDefinition> {
        self.categories
            .get(category)
            .map(|names| names.iter().filter_map(|n| self.tools.get(n)).collect())
            .unwrap_or_default()
    }

    /// Sorted category names.
    pub fn get_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.categories.keys().cloned().collect();
        categories.sort();
        categories
    }

    /// All metadata sorted by name, skipping invalid entries.
    pub fn get_all_tools_metadata(&self) -> Vec<&ToolMetadata> {
        let mut all: Vec<&ToolMetadata> = self
            .tools
            .values()
            .filter_map(|def| match def.metadata.validate() {
                Ok(()) => Some(def.metadata.as_ref()),
                Err(e) => {
                    tracing::warn!(
                        "tool_metadata_skipped: tool={:?} error={}",
                        def.metadata.name,
                        e
                    );
                    None
                }
            })
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Case-insensitive substring match over name and description.
    pub fn search_tools(&self, query: &str) -> Vec<&ToolMetadata> {
        let needle = query.to_lowercase();
        self.get_all_tools_metadata()
            .into_iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn get_statistics(&self) -> RegistryStatistics {
        RegistryStatistics {
            total_tools: self.tools.len(),
            category_count: self.categories.len(),
            per_category: self
                .categories
                .iter()
                .map(|(c, names)| (c.clone(), names.len()))
                .collect(),
            deprecated_count: self
                .tools
                .values()
                .filter(|d| d.metadata.deprecated)
                .count(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
