//! ToolHost - the explicitly constructed context behind the MCP server.
//!
//! Owns the registry (read-only), the usage tracker and the dynamic tool
//! manager. The entry point builds one host and shares it as
//! `Arc<tokio::sync::Mutex<ToolHost>>`; holding that lock is what serializes
//! every mutation of activation and workflow state.

pub mod eviction;
mod meta;
mod resources;

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::bridge::EngineBridge;
use crate::manager::{
    CallToolResult, DynamicToolManager, EvictionReport, ManagerConfig, ToolListChanged,
};
use crate::tools::{ToolMetadata, ToolRegistry, META_CATEGORY};
use crate::types::Config;
use crate::workflow::{UsageTracker, WorkflowPolicy};

pub use eviction::EvictionService;
pub use resources::{
    resource_templates, CATEGORIES_URI, CATEGORY_URI_PREFIX, TOOL_URI_PREFIX,
};

#[derive(Debug)]
pub struct ToolHost {
    registry: Arc<ToolRegistry>,
    tracker: UsageTracker,
    manager: DynamicToolManager,
}

impl ToolHost {
    pub fn new(
        registry: Arc<ToolRegistry>,
        bridge: Arc<dyn EngineBridge>,
        config: &Config,
        notifier: Option<mpsc::UnboundedSender<ToolListChanged>>,
    ) -> Self {
        Self::with_settings(
            registry,
            bridge,
            ManagerConfig::from(config),
            config.workflow.policy,
            notifier,
        )
    }

    pub fn with_settings(
        registry: Arc<ToolRegistry>,
        bridge: Arc<dyn EngineBridge>,
        manager_config: ManagerConfig,
        policy: WorkflowPolicy,
        notifier: Option<mpsc::UnboundedSender<ToolListChanged>>,
    ) -> Self {
        let tracker = UsageTracker::new(registry.clone(), policy);
        let manager = DynamicToolManager::new(registry.clone(), bridge, manager_config, notifier);
        Self {
            registry,
            tracker,
            manager,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn tracker(&self) -> &UsageTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut UsageTracker {
        &mut self.tracker
    }

    pub fn manager(&self) -> &DynamicToolManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut DynamicToolManager {
        &mut self.manager
    }

    /// Start a new workflow session (on `initialize`).
    pub fn begin_session(&mut self) {
        self.tracker.reset();
    }

    /// Meta tools plus active tools, sorted by name.
    pub fn list_tools(&self) -> Vec<Arc<ToolMetadata>> {
        let mut tools: Vec<Arc<ToolMetadata>> = self
            .registry
            .get_tools_by_category(META_CATEGORY)
            .into_iter()
            .map(|d| d.metadata.clone())
            .collect();
        tools.extend(self.manager.active_tools());
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// `tools/call`: meta tools run here, everything else via the manager's
    /// direct path (which requires activation).
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> CallToolResult {
        let is_meta = self
            .registry
            .get_tool(name)
            .map(|d| d.metadata.is_meta())
            .unwrap_or(false);

        if is_meta {
            self.call_meta_tool(name, arguments).await
        } else {
            self.manager
                .call_active_tool(&mut self.tracker, name, arguments)
                .await
        }
    }

    pub fn evict_idle(&mut self) -> EvictionReport {
        self.manager.evict_idle()
    }
}
