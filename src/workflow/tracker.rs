//! Usage tracker - records discovery reads and tool calls, gates invocations.
//!
//! NOT a separate actor - owned by ToolHost and called via &mut self.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::state::{ResourceAccess, WorkflowDecision, WorkflowPhase, WorkflowPolicy, WorkflowState};
use crate::tools::ToolRegistry;

/// Serializable view of the tracker, reported by `get_tool_statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub session_id: String,
    pub policy: WorkflowPolicy,
    pub phase: WorkflowPhase,
    pub loaded_categories: BTreeSet<String>,
    pub used_categories: BTreeSet<String>,
    pub viewed_tools: BTreeSet<String>,
    pub tool_invocations: BTreeMap<String, u64>,
}

/// Per-session workflow gate.
#[derive(Debug)]
pub struct UsageTracker {
    registry: Arc<ToolRegistry>,
    policy: WorkflowPolicy,
    state: WorkflowState,
}

impl UsageTracker {
    pub fn new(registry: Arc<ToolRegistry>, policy: WorkflowPolicy) -> Self {
        Self {
            registry,
            policy,
            state: WorkflowState::new(),
        }
    }

    pub fn policy(&self) -> WorkflowPolicy {
        self.policy
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Record a read of a discovery resource.
    pub fn record_resource_access(&mut self, access: ResourceAccess) {
        match access {
            ResourceAccess::Overview => {
                self.state.categories_browsed = true;
                tracing::debug!("workflow_categories_browsed: session={}", self.state.session_id);
            }
            ResourceAccess::CategoryDetail(category) => self.record_category_loaded(&category),
            ResourceAccess::ToolDetail(name) => {
                self.state.viewed_tools.insert(name);
            }
        }
    }

    /// Mark a category as loaded. Loading implies the overview was seen.
    pub fn record_category_loaded(&mut self, category: &str) {
        self.state.categories_browsed = true;
        self.state.current_category = Some(category.to_string());
        if self.state.loaded_categories.insert(category.to_string()) {
            tracing::debug!(
                "workflow_category_loaded: session={} category={}",
                self.state.session_id,
                category
            );
        }
    }

    /// Mark the tool's category as used, whatever the gate decided.
    pub fn record_tool_usage(&mut self, tool_name: &str) {
        *self
            .state
            .tool_invocations
            .entry(tool_name.to_string())
            .or_insert(0) += 1;
        if let Some(definition) = self.registry.get_tool(tool_name) {
            self.state
                .used_categories
                .insert(definition.category().to_string());
        }
    }

    /// Decide whether `tool_name` may run given the discovery so far.
    ///
    /// Meta and unknown tools are always allowed. Under `Block`, only loading
    /// the category lifts the block; under `Warn`, the warning is emitted
    /// once per category.
    pub fn check_hierarchical_workflow(&self, tool_name: &str) -> WorkflowDecision {
        let definition = match self.registry.get_tool(tool_name) {
            Some(definition) if !definition.metadata.is_meta() => definition,
            _ => return WorkflowDecision::allow(),
        };
        let category = definition.category();

        if self.state.loaded_categories.contains(category) {
            return WorkflowDecision::allow();
        }

        match self.policy {
            WorkflowPolicy::Block => WorkflowDecision::block(format!(
                "Tool '{}' belongs to category '{}', which has not been loaded in this session. \
                 Read unity://categories, then unity://categories/{} (or call register_category) \
                 before invoking it.",
                tool_name, category, category
            )),
            WorkflowPolicy::Warn if self.state.used_categories.contains(category) => {
                WorkflowDecision::allow()
            }
            WorkflowPolicy::Warn => WorkflowDecision::warn(format!(
                "Workflow warning: '{}' was called before category '{}' was loaded. \
                 Recommended sequence: unity://categories -> unity://categories/{} -> tool call.",
                tool_name, category, category
            )),
        }
    }

    /// Start a fresh session.
    pub fn reset(&mut self) {
        self.state = WorkflowState::new();
        tracing::debug!("workflow_reset: session={}", self.state.session_id);
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            session_id: self.state.session_id.to_string(),
            policy: self.policy,
            phase: self.state.phase(),
            loaded_categories: self.state.loaded_categories.clone(),
            used_categories: self.state.used_categories.clone(),
            viewed_tools: self.state.viewed_tools.clone(),
            tool_invocations: self.state.tool_invocations.clone(),
        }
    }
}
