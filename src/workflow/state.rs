//! Workflow policy and per-session state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::types::{Error, SessionId};

/// How the gate reacts when a tool's category was never loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowPolicy {
    /// Execute anyway, prepend a warning to the result.
    #[default]
    Warn,
    /// Refuse the call before any dispatch.
    Block,
}

impl FromStr for WorkflowPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(WorkflowPolicy::Warn),
            "block" | "strict" => Ok(WorkflowPolicy::Block),
            other => Err(Error::config(format!(
                "unknown workflow policy '{}', expected 'warn' or 'block'",
                other
            ))),
        }
    }
}

impl fmt::Display for WorkflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowPolicy::Warn => f.write_str("warn"),
            WorkflowPolicy::Block => f.write_str("block"),
        }
    }
}

/// Discovery progress: Uninitiated → CategoriesBrowsed → CategoryLoaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "category", rename_all = "snake_case")]
pub enum WorkflowPhase {
    Uninitiated,
    CategoriesBrowsed,
    CategoryLoaded(String),
}

/// A discovery resource read by the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAccess {
    /// `unity://categories`
    Overview,
    /// `unity://categories/{category}`
    CategoryDetail(String),
    /// `unity://tools/{name}`
    ToolDetail(String),
}

/// Outcome of a workflow check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl WorkflowDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            warning: None,
        }
    }

    pub fn warn(message: String) -> Self {
        Self {
            allowed: true,
            warning: Some(message),
        }
    }

    pub fn block(message: String) -> Self {
        Self {
            allowed: false,
            warning: Some(message),
        }
    }
}

/// What the assistant has read and invoked in the current session.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub session_id: SessionId,
    pub categories_browsed: bool,
    /// Most recently loaded category.
    pub current_category: Option<String>,
    pub loaded_categories: BTreeSet<String>,
    pub used_categories: BTreeSet<String>,
    pub viewed_tools: BTreeSet<String>,
    pub tool_invocations: BTreeMap<String, u64>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            session_id: SessionId::new(),
            categories_browsed: false,
            current_category: None,
            loaded_categories: BTreeSet::new(),
            used_categories: BTreeSet::new(),
            viewed_tools: BTreeSet::new(),
            tool_invocations: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        match (&self.current_category, self.categories_browsed) {
            (Some(category), _) => WorkflowPhase::CategoryLoaded(category.clone()),
            (None, true) => WorkflowPhase::CategoriesBrowsed,
            (None, false) => WorkflowPhase::Uninitiated,
        }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("warn".parse::<WorkflowPolicy>().unwrap(), WorkflowPolicy::Warn);
        assert_eq!(" BLOCK ".parse::<WorkflowPolicy>().unwrap(), WorkflowPolicy::Block);
        assert_eq!("strict".parse::<WorkflowPolicy>().unwrap(), WorkflowPolicy::Block);
        assert!(matches!(
            "sometimes".parse::<WorkflowPolicy>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_phase_progression() {
        let mut state = WorkflowState::new();
        assert_eq!(state.phase(), WorkflowPhase::Uninitiated);

        state.categories_browsed = true;
        assert_eq!(state.phase(), WorkflowPhase::CategoriesBrowsed);

        state.current_category = Some("physics".to_string());
        assert_eq!(
            state.phase(),
            WorkflowPhase::CategoryLoaded("physics".to_string())
        );
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_value(WorkflowPhase::CategoryLoaded("ui".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"phase": "category_loaded", "category": "ui"}));
        let json = serde_json::to_value(WorkflowPhase::Uninitiated).unwrap();
        assert_eq!(json, serde_json::json!({"phase": "uninitiated"}));
    }
}
