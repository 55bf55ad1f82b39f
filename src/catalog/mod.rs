//! Built-in tool catalog.
//!
//! Each category module exposes `CATEGORY`, `DESCRIPTION` and `tools()`.
//! Engine tools are thin descriptors; the editor plugin implements them.

pub mod animation;
pub mod meta;
pub mod physics;
pub mod scene;
pub mod scripting;
pub mod ui;

use crate::tools::{ToolDefinition, ToolRegistry, META_CATEGORY};

/// Every built-in definition, meta tools included.
pub fn all_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(animation::tools());
    tools.extend(physics::tools());
    tools.extend(scene::tools());
    tools.extend(scripting::tools());
    tools.extend(ui::tools());
    tools.extend(meta::tools());
    tools
}

/// Build the process-wide registry from the built-in catalog.
pub fn build_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let registered = registry.register_all(all_tools());

    for (category, description) in [
        (animation::CATEGORY, animation::DESCRIPTION),
        (physics::CATEGORY, physics::DESCRIPTION),
        (scene::CATEGORY, scene::DESCRIPTION),
        (scripting::CATEGORY, scripting::DESCRIPTION),
        (ui::CATEGORY, ui::DESCRIPTION),
        (META_CATEGORY, meta::DESCRIPTION),
    ] {
        registry.describe_category(category, description);
    }

    tracing::info!(
        "tool_registry_built: tools={} categories={}",
        registered,
        registry.get_categories().len()
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_registers_cleanly() {
        let registry = build_registry();
        assert_eq!(registry.len(), all_tools().len());
        assert_eq!(
            registry.get_categories(),
            vec!["animation", "meta", "physics", "scene", "scripting", "ui"]
        );
    }

    #[test]
    fn test_every_category_is_described() {
        let registry = build_registry();
        for category in registry.get_categories() {
            assert!(
                registry.category_description(&category).is_some(),
                "missing description for {}",
                category
            );
        }
    }

    #[test]
    fn test_exactly_one_deprecated_tool() {
        assert_eq!(build_registry().get_statistics().deprecated_count, 1);
    }

    #[test]
    fn test_meta_tools_are_server_only() {
        for tool in meta::tools() {
            assert!(tool.metadata.server_only);
            assert!(tool.metadata.is_meta());
        }
    }
}
