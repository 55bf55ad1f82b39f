//! Scene hierarchy and GameObject tools.

use serde_json::json;

use crate::tools::{define_tool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata};

pub const CATEGORY: &str = "scene";
pub const DESCRIPTION: &str = "GameObjects, transforms, hierarchy queries and scene files";

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        define_tool(
            ToolMetadata::new("create_game_object", CATEGORY, "Create a GameObject, optionally from a primitive")
                .param(ParamDef::required("name", ParamType::String, "GameObject name"))
                .param(ParamDef::optional(
                    "primitiveType",
                    ParamType::Enum(
                        ["Cube", "Sphere", "Capsule", "Cylinder", "Plane", "Quad"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    ),
                    "Primitive mesh to create",
                ))
                .param(ParamDef::optional("position", ParamType::NumberList, "World position [x, y, z]"))
                .param(ParamDef::optional("parentName", ParamType::String, "Parent GameObject"))
                .tags(&["gameobject", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("delete_game_object", CATEGORY, "Delete a GameObject and its children")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .tags(&["gameobject", "delete"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("find_game_objects", CATEGORY, "Find GameObjects by name, tag or component")
                .param(ParamDef::optional("namePattern", ParamType::String, "Substring of the name"))
                .param(ParamDef::optional("tag", ParamType::String, "Tag to match"))
                .param(ParamDef::optional("componentType", ParamType::String, "Component type name"))
                .tags(&["gameobject", "query"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("set_transform", CATEGORY, "Set position, rotation and scale")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::optional("position", ParamType::NumberList, "Position [x, y, z]"))
                .param(ParamDef::optional("rotation", ParamType::NumberList, "Euler angles [x, y, z]"))
                .param(ParamDef::optional("scale", ParamType::NumberList, "Local scale [x, y, z]"))
                .tags(&["transform"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("get_scene_hierarchy", CATEGORY, "Describe the open scene's hierarchy")
                .param(ParamDef::optional("maxDepth", ParamType::Int, "Depth limit").with_default(json!(10)))
                .tags(&["query"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("save_scene", CATEGORY, "Save the open scene")
                .param(ParamDef::optional("scenePath", ParamType::String, "Save-as path"))
                .tags(&["scene", "save"]),
            ToolHandler::Engine,
        ),
    ]
}
