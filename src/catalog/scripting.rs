//! C# script tools, including the server-only template generator.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::tools::{
    define_tool, LocalTool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata,
};
use crate::types::{Error, Result};

pub const CATEGORY: &str = "scripting";
pub const DESCRIPTION: &str = "Create, edit, attach and inspect C# scripts";

const BASE_CLASSES: [&str; 3] = ["MonoBehaviour", "ScriptableObject", "EditorWindow"];

fn base_class_param() -> ParamDef {
    ParamDef::optional(
        "baseClass",
        ParamType::Enum(BASE_CLASSES.iter().map(|s| s.to_string()).collect()),
        "Base class of the generated type",
    )
    .with_default(json!("MonoBehaviour"))
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        define_tool(
            ToolMetadata::new("create_script", CATEGORY, "Create a new C# script asset")
                .param(ParamDef::required("scriptName", ParamType::String, "Class and file name"))
                .param(
                    ParamDef::optional("folderPath", ParamType::String, "Target folder")
                        .with_default(json!("Assets/Scripts")),
                )
                .param(ParamDef::optional("namespace", ParamType::String, "Enclosing namespace"))
                .param(base_class_param())
                .tags(&["script", "create"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("modify_script", CATEGORY, "Replace the contents of a C# script")
                .param(ParamDef::required("scriptPath", ParamType::String, "Asset path of the script"))
                .param(ParamDef::required("content", ParamType::String, "New source code"))
                .tags(&["script", "edit"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("get_script_content", CATEGORY, "Read the source of a C# script")
                .param(ParamDef::required("scriptPath", ParamType::String, "Asset path of the script"))
                .tags(&["script", "read"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("attach_script", CATEGORY, "Attach a script component to a GameObject")
                .param(ParamDef::required("gameObjectName", ParamType::String, "Target GameObject"))
                .param(ParamDef::required("scriptName", ParamType::String, "Script class name"))
                .tags(&["script", "component"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new("delete_script", CATEGORY, "Delete a C# script asset")
                .param(ParamDef::required("scriptPath", ParamType::String, "Asset path of the script"))
                .tags(&["script", "delete"]),
            ToolHandler::Engine,
        ),
        define_tool(
            ToolMetadata::new(
                "generate_script_template",
                CATEGORY,
                "Generate C# boilerplate without touching the project",
            )
            .param(ParamDef::required("className", ParamType::String, "Class name"))
            .param(base_class_param())
            .param(ParamDef::optional("namespace", ParamType::String, "Enclosing namespace"))
            .tags(&["script", "template", "offline"]),
            ToolHandler::Local(Arc::new(ScriptTemplateGenerator)),
        ),
    ]
}

/// Renders C# boilerplate in-process.
#[derive(Debug)]
pub struct ScriptTemplateGenerator;

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn render_template(class_name: &str, base_class: &str, namespace: Option<&str>) -> String {
    let (usings, body) = match base_class {
        "ScriptableObject" => (
            "using UnityEngine;\n",
            format!(
                "[CreateAssetMenu(fileName = \"{0}\", menuName = \"Data/{0}\")]\npublic class {0} : ScriptableObject\n{{\n}}\n",
                class_name
            ),
        ),
        "EditorWindow" => (
            "using UnityEditor;\nusing UnityEngine;\n",
            format!(
                "public class {0} : EditorWindow\n{{\n    [MenuItem(\"Window/{0}\")]\n    public static void ShowWindow()\n    {{\n        GetWindow<{0}>(\"{0}\");\n    }}\n\n    private void OnGUI()\n    {{\n    }}\n}}\n",
                class_name
            ),
        ),
        _ => (
            "using UnityEngine;\n",
            format!(
                "public class {0} : MonoBehaviour\n{{\n    private void Start()\n    {{\n    }}\n\n    private void Update()\n    {{\n    }}\n}}\n",
                class_name
            ),
        ),
    };

    match namespace {
        Some(ns) => {
            let indented: String = body
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        "\n".to_string()
                    } else {
                        format!("    {}\n", line)
                    }
                })
                .collect();
            format!("{}\nnamespace {}\n{{\n{}}}\n", usings, ns, indented)
        }
        None => format!("{}\n{}", usings, body),
    }
}

#[async_trait]
impl LocalTool for ScriptTemplateGenerator {
    async fn execute(&self, params: Value) -> Result<Value> {
        let class_name = params
            .get("className")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::validation("className is required"))?;
        if !is_identifier(class_name) {
            return Err(Error::validation(format!(
                "'{}' is not a valid C# class name",
                class_name
            )));
        }
        let base_class = params
            .get("baseClass")
            .and_then(Value::as_str)
            .unwrap_or("MonoBehaviour");
        let namespace = params.get("namespace").and_then(Value::as_str);

        let code = render_template(class_name, base_class, namespace);
        Ok(json!({
            "success": true,
            "message": format!("Generated {} template for {}", base_class, class_name),
            "data": {
                "className": class_name,
                "baseClass": base_class,
                "fileName": format!("{}.cs", class_name),
                "code": code,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_template_monobehaviour() {
        let result = ScriptTemplateGenerator
            .execute(json!({"className": "PlayerController"}))
            .await
            .unwrap();
        let code = result["data"]["code"].as_str().unwrap();
        assert!(code.contains("public class PlayerController : MonoBehaviour"));
        assert!(code.contains("void Update()"));
        assert_eq!(result["data"]["fileName"], "PlayerController.cs");
    }

    #[tokio::test]
    async fn test_template_namespace_wraps_class() {
        let result = ScriptTemplateGenerator
            .execute(json!({"className": "Stats", "baseClass": "ScriptableObject", "namespace": "Game.Data"}))
            .await
            .unwrap();
        let code = result["data"]["code"].as_str().unwrap();
        assert!(code.contains("namespace Game.Data\n{"));
        assert!(code.contains("    public class Stats : ScriptableObject"));
    }

    #[tokio::test]
    async fn test_template_rejects_invalid_class_name() {
        let err = ScriptTemplateGenerator
            .execute(json!({"className": "2Fast"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_only_template_generator_is_server_only() {
        let server_only: Vec<String> = tools()
            .into_iter()
            .filter(|t| t.metadata.server_only)
            .map(|t| t.metadata.name.clone())
            .collect();
        assert_eq!(server_only, vec!["generate_script_template"]);
    }
}
