//! Rigidbody, collider and physics-world tools.

use serde_json::json;

use crate::tools::{define_tool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata};

pub const CATEGORY: &str = "physics";
pub const DESCRIPTION: &str = "Rigidbodies, colliders, forces, raycasts and global physics settings";

fn variants(names: &[&str]) -> ParamType {
    ParamType::Enum(names.iter().map(|s| s.to_string()).collect())
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        define_tool(
            ToolMetadata::new("add_rigidbody", CATEGORY, "Add a Rigidbody to a GameObject")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::optional("mass", ParamType::Float, "Mass in kilograms").with_default(json!(1.0)))
                .param(ParamDef::optional("useGravity", ParamType::Bool, "Affected by gravity").with_default(json!(true)))
                .param(ParamDef::optional("isKinematic", ParamType::Bool, "Driven by animation, not physics"))
                .tags(&["rigidbody", "component"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("add_collider", CATEGORY, "Add a collider to a GameObject")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::required(
                    "colliderType",
                    variants(&["Box", "Sphere", "Capsule", "Mesh"]),
                    "Collider shape",
                ))
                .param(ParamDef::optional("isTrigger", ParamType::Bool, "Trigger instead of solid").with_default(json!(false)))
                .tags(&["collider", "component"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("apply_force", CATEGORY, "Apply a force to a Rigidbody")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::required("force", ParamType::NumberList, "Force vector [x, y, z]"))
                .param(
                    ParamDef::optional(
                        "forceMode",
                        variants(&["Force", "Impulse", "Acceleration", "VelocityChange"]),
                        "How the force is applied",
                    )
                    .with_default(json!("Force")),
                )
                .tags(&["rigidbody", "force"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("set_gravity", CATEGORY, "Change the global gravity vector")
                .param(ParamDef::required("gravity", ParamType::NumberList, "Gravity vector [x, y, z]"))
                .tags(&["settings"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("raycast", CATEGORY, "Cast a ray and report the first hit")
                .param(ParamDef::required("origin", ParamType::NumberList, "Ray origin [x, y, z]"))
                .param(ParamDef::required("direction", ParamType::NumberList, "Ray direction [x, y, z]"))
                .param(ParamDef::optional("maxDistance", ParamType::Float, "Maximum distance").with_default(json!(100.0)))
                .tags(&["query"]),
            ToolHandler::Engine,
        ),
    ]
}
