//! Animation clip and Animator tools.

use serde_json::json;

use crate::tools::{define_tool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata};

pub const CATEGORY: &str = "animation";
pub const DESCRIPTION: &str = "Animation clips, curves and Animator controllers";

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        define_tool(
            ToolMetadata::new("create_animation_clip", CATEGORY, "Create an AnimationClip asset")
                .param(ParamDef::required("clipName", ParamType::String, "Clip name"))
                .param(
                    ParamDef::optional("folderPath", ParamType::String, "Target folder")
                        .with_default(json!("Assets/Animations")),
                )
                .param(ParamDef::optional("length", ParamType::Float, "Length in seconds").with_default(json!(1.0)))
                .param(ParamDef::optional("loop", ParamType::Bool, "Loop playback").with_default(json!(false)))
                .tags(&["clip", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("add_animation_curve", CATEGORY, "Add a keyframed curve to a clip")
                .param(ParamDef::required("clipPath", ParamType::String, "Asset path of the clip"))
                .param(ParamDef::required("componentType", ParamType::String, "Animated component type"))
                .param(ParamDef::required("propertyPath", ParamType::String, "Property, e.g. localPosition.x"))
                .param(ParamDef::required("times", ParamType::NumberList, "Keyframe times"))
                .param(ParamDef::required("values", ParamType::NumberList, "Keyframe values"))
                .tags(&["clip", "curve"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("create_animator_controller", CATEGORY, "Create an AnimatorController asset")
                .param(ParamDef::required("controllerName", ParamType::String, "Controller name"))
                .param(
                    ParamDef::optional("folderPath", ParamType::String, "Target folder")
                        .with_default(json!("Assets/Animations")),
                )
                .tags(&["animator", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("assign_animator", CATEGORY, "Assign a controller to a GameObject's Animator")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::required("controllerPath", ParamType::String, "Asset path of the controller"))
                .tags(&["animator", "component"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("play_animation", CATEGORY, "Play an Animator state")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::required("stateName", ParamType::String, "Animator state"))
                .param(ParamDef::optional("layer", ParamType::Int, "Animator layer").with_default(json!(0)))
                .tags(&["animator", "playback"]),
            ToolHandler::Engine,
        ),
    ]
}
