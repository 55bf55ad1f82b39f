//! uGUI canvas and element tools.

use serde_json::json;

use crate::tools::{define_tool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata};

pub const CATEGORY: &str = "ui";
pub const DESCRIPTION: &str = "Canvases, buttons, text and RectTransform layout";

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        define_tool(
            ToolMetadata::new("create_canvas", CATEGORY, "Create a Canvas with an EventSystem")
                .param(ParamDef::required("canvasName", ParamType::String, "Canvas name"))
                .param(
                    ParamDef::optional(
                        "renderMode",
                        ParamType::Enum(
                            ["ScreenSpaceOverlay", "ScreenSpaceCamera", "WorldSpace"]
                                .iter()
                                .map(|s| s.to_string())
                                .collect(),
                        ),
                        "Canvas render mode",
                    )
                    .with_default(json!("ScreenSpaceOverlay")),
                )
                .tags(&["canvas", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("create_button", CATEGORY, "Create a Button under a canvas")
                .param(ParamDef::required("buttonName", ParamType::String, "Button name"))
                .param(ParamDef::required("canvasName", ParamType::String, "Parent canvas"))
                .param(ParamDef::optional("text", ParamType::String, "Label").with_default(json!("Button")))
                .param(ParamDef::optional("position", ParamType::NumberList, "Anchored position [x, y]"))
                .tags(&["button", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("create_text", CATEGORY, "Create a TextMeshPro text element")
                .param(ParamDef::required("textName", ParamType::String, "Element name"))
                .param(ParamDef::required("canvasName", ParamType::String, "Parent canvas"))
                .param(ParamDef::required("text", ParamType::String, "Displayed text"))
                .param(ParamDef::optional("fontSize", ParamType::Int, "Font size").with_default(json!(14)))
                .tags(&["text", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("set_rect_transform", CATEGORY, "Adjust a RectTransform's layout")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target element"))
                .param(ParamDef::optional("anchoredPosition", ParamType::NumberList, "[x, y]"))
                .param(ParamDef::optional("sizeDelta", ParamType::NumberList, "[width, height]"))
                .param(ParamDef::optional("anchorMin", ParamType::NumberList, "[x, y] in 0..1"))
                .param(ParamDef::optional("anchorMax", ParamType::NumberList, "[x, y] in 0..1"))
                .tags(&["layout"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("create_legacy_text", CATEGORY, "Create a legacy UnityEngine.UI.Text element; use create_text")
                .param(ParamDef::required("textName", ParamType::String, "Element name"))
                .param(ParamDef::required("canvasName", ParamType::String, "Parent canvas"))
                .param(ParamDef::required("text", ParamType::String, "Displayed text"))
                .version("0.9.0")
                .deprecated()
                .tags(&["text", "legacy"]),
            ToolHandler::Engine,
        ),
    ]
}
