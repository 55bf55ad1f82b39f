//! Discovery and activation tools. Always listed, served by the host.

use crate::tools::{
    define_tool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata, META_CATEGORY,
};

pub const DESCRIPTION: &str = "Discovery, activation and statistics tools (always available)";

pub const REGISTER_CATEGORY: &str = "register_category";
pub const UNREGISTER_CATEGORY: &str = "unregister_category";
pub const DISCOVER_AND_USE_TOOL: &str = "discover_and_use_tool";
pub const DISCOVER_AND_USE_TOOL_RAW: &str = "discover_and_use_tool_raw";
pub const SEARCH_TOOLS: &str = "search_tools";
pub const GET_TOOL_STATISTICS: &str = "get_tool_statistics";

fn meta(name: &str, description: &str) -> ToolMetadata {
    ToolMetadata::new(name, META_CATEGORY, description).tags(&["meta"])
}

fn invocation(name: &str, description: &str) -> ToolMetadata {
    meta(name, description)
        .param(ParamDef::required("toolName", ParamType::String, "Tool to invoke"))
        .param(ParamDef::optional("params", ParamType::Object, "Tool parameters"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        define_tool(
            meta(
                REGISTER_CATEGORY,
                "Activate every tool in a category so it can be called directly",
            )
            .param(ParamDef::required("category", ParamType::String, "Category name")),
            ToolHandler::Meta,
        ),
        define_tool(
            meta(UNREGISTER_CATEGORY, "Deactivate every tool in a category")
                .param(ParamDef::required("category", ParamType::String, "Category name")),
            ToolHandler::Meta,
        ),
        define_tool(
            invocation(
                DISCOVER_AND_USE_TOOL,
                "Invoke any catalog tool by name without activating its category",
            ),
            ToolHandler::Meta,
        ),
        define_tool(
            invocation(
                DISCOVER_AND_USE_TOOL_RAW,
                "Invoke any catalog tool by name and return the editor's raw JSON result",
            ),
            ToolHandler::Meta,
        ),
        define_tool(
            meta(SEARCH_TOOLS, "Search tool names and descriptions")
                .param(ParamDef::required("query", ParamType::String, "Case-insensitive substring")),
            ToolHandler::Meta,
        ),
        define_tool(
            meta(
                GET_TOOL_STATISTICS,
                "Report catalog, activation and workflow statistics",
            ),
            ToolHandler::Meta,
        ),
    ]
}
