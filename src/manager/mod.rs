//! Dynamic tool manager - category activation, invocation, idle eviction.
//!
//! Per tool: Unregistered → Active → (idle timeout) → Unregistered. Active
//! tools reset their idle clock on every invocation. Only active tools are
//! advertised in `tools/list`, which keeps the assistant's context small.
//!
//! NOT a separate actor - owned by ToolHost and called via &mut self. The
//! host's mutex serializes every mutation of the active map and category
//! index.

pub mod response;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::bridge::{EngineBridge, EngineRequest};
use crate::tools::{
    check_params, normalize_params, ToolDefinition, ToolHandler, ToolMetadata, ToolRegistry,
    META_CATEGORY,
};
use crate::types::{Config, Error, Result};
use crate::workflow::UsageTracker;

pub use response::{CallToolResult, ContentBlock};

// =============================================================================
// Types
// =============================================================================

/// Manager tuning.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Active tools idle longer than this are evicted.
    pub idle_timeout: Duration,
    /// Upper bound for one bridge call.
    pub request_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for ManagerConfig {
    fn from(config: &Config) -> Self {
        Self {
            idle_timeout: config.lifecycle.idle_timeout,
            request_timeout: config.bridge.request_timeout,
        }
    }
}

/// "Tool list changed" event. One per activation, deactivation or sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolListChanged {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// One active (callable) tool.
#[derive(Debug, Clone)]
pub struct RegisteredToolEntry {
    pub handler: ToolHandler,
    pub metadata: Arc<ToolMetadata>,
    pub category: String,
    pub registered_at: Instant,
    pub last_used_at: Instant,
    pub use_count: u64,
}

/// Result of `register_category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryActivation {
    pub success: bool,
    pub message: String,
    pub tools_registered: Vec<String>,
    pub tools_already_registered: Vec<String>,
}

/// Result of `unregister_category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeactivation {
    pub success: bool,
    pub message: String,
    pub tools_unregistered: Vec<String>,
}

/// Outcome of one idle sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvictionReport {
    pub evicted: Vec<String>,
    pub swept_at: DateTime<Utc>,
}

/// Manager statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStatistics {
    pub total_active: usize,
    pub active_categories: usize,
    pub per_category: BTreeMap<String, usize>,
    pub idle_seconds: BTreeMap<String, u64>,
    pub use_counts: BTreeMap<String, u64>,
    pub evictions_total: u64,
    pub last_sweep: Option<DateTime<Utc>>,
}

/// Resolved, gated invocation. `outcome` holds everything after the gate.
struct Invocation {
    category: String,
    warning: Option<String>,
    outcome: Result<Value>,
}

// =============================================================================
// Manager
// =============================================================================

pub struct DynamicToolManager {
    registry: Arc<ToolRegistry>,
    bridge: Arc<dyn EngineBridge>,
    config: ManagerConfig,
    notifier: Option<mpsc::UnboundedSender<ToolListChanged>>,
    active: HashMap<String, RegisteredToolEntry>,
    category_index: BTreeMap<String, BTreeSet<String>>,
    evictions_total: u64,
    last_sweep: Option<DateTime<Utc>>,
}

impl fmt::Debug for DynamicToolManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicToolManager")
            .field("config", &self.config)
            .field("active", &self.active.len())
            .field("category_index", &self.category_index)
            .field("evictions_total", &self.evictions_total)
            .finish_non_exhaustive()
    }
}

impl DynamicToolManager {
    pub fn new(
        registry: Arc<ToolRegistry>,
        bridge: Arc<dyn EngineBridge>,
        config: ManagerConfig,
        notifier: Option<mpsc::UnboundedSender<ToolListChanged>>,
    ) -> Self {
        Self {
            registry,
            bridge,
            config,
            notifier,
            active: HashMap::new(),
            category_index: BTreeMap::new(),
            evictions_total: 0,
            last_sweep: None,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Make every tool of `category` callable.
    ///
    /// Already-active tools get their idle clock refreshed. Emits one
    /// notification, and only if something was newly registered.
    pub fn register_category(&mut self, category: &str) -> CategoryActivation {
        if category == META_CATEGORY {
            return CategoryActivation {
                success: false,
                message: "Meta tools are always available and cannot be activated as a category"
                    .to_string(),
                tools_registered: Vec::new(),
                tools_already_registered: Vec::new(),
            };
        }

        let definitions = self.registry.get_tools_by_category(category);
        if definitions.is_empty() {
            let available = self
                .registry
                .get_categories()
                .into_iter()
                .filter(|c| c != META_CATEGORY)
                .collect::<Vec<_>>()
                .join(", ");
            return CategoryActivation {
                success: false,
                message: format!(
                    "Unknown category '{}'. Available categories: {}",
                    category, available
                ),
                tools_registered: Vec::new(),
                tools_already_registered: Vec::new(),
            };
        }

        let now = Instant::now();
        let mut registered = Vec::new();
        let mut already = Vec::new();

        for definition in definitions {
            let name = definition.name().to_string();
            if let Some(entry) = self.active.get_mut(&name) {
                entry.last_used_at = now;
                already.push(name);
                continue;
            }
            self.active.insert(
                name.clone(),
                RegisteredToolEntry {
                    handler: definition.handler.clone(),
                    metadata: definition.metadata.clone(),
                    category: category.to_string(),
                    registered_at: now,
                    last_used_at: now,
                    use_count: 0,
                },
            );
            self.category_index
                .entry(category.to_string())
                .or_default()
                .insert(name.clone());
            registered.push(name);
        }

        tracing::info!(
            "tool_category_activated: category={} registered={} already_registered={}",
            category,
            registered.len(),
            already.len()
        );

        let message = format!(
            "Category '{}': {} tool(s) registered, {} already registered",
            category,
            registered.len(),
            already.len()
        );
        if !registered.is_empty() {
            self.notify(registered.clone(), Vec::new());
        }

        CategoryActivation {
            success: true,
            message,
            tools_registered: registered,
            tools_already_registered: already,
        }
    }

    /// Remove every active tool of `category`. One notification if any.
    pub fn unregister_category(&mut self, category: &str) -> CategoryDeactivation {
        let names: Vec<String> = self
            .category_index
            .get(category)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default();

        if names.is_empty() {
            return CategoryDeactivation {
                success: false,
                message: format!("Category '{}' has no active tools", category),
                tools_unregistered: Vec::new(),
            };
        }

        let removed = self.unregister_tools(names);

        tracing::info!(
            "tool_category_deactivated: category={} removed={}",
            category,
            removed.len()
        );

        CategoryDeactivation {
            success: true,
            message: format!(
                "Category '{}': {} tool(s) unregistered",
                category,
                removed.len()
            ),
            tools_unregistered: removed,
        }
    }

    /// Remove the given active tools. Returns the names that were active,
    /// with one notification for the whole batch if any.
    pub(crate) fn unregister_tools(&mut self, names: Vec<String>) -> Vec<String> {
        let removed: Vec<String> = names
            .into_iter()
            .filter(|name| self.remove_entry(name))
            .collect();
        if !removed.is_empty() {
            self.notify(Vec::new(), removed.clone());
        }
        removed
    }

    fn remove_entry(&mut self, name: &str) -> bool {
        let Some(entry) = self.active.remove(name) else {
            return false;
        };
        if let Some(names) = self.category_index.get_mut(&entry.category) {
            names.remove(name);
            if names.is_empty() {
                self.category_index.remove(&entry.category);
            }
        }
        true
    }

    fn notify(&self, added: Vec<String>, removed: Vec<String>) {
        if let Some(tx) = &self.notifier {
            if tx.send(ToolListChanged { added, removed }).is_err() {
                tracing::debug!("tool_list_changed_dropped: receiver closed");
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    pub fn active_entry(&self, name: &str) -> Option<&RegisteredToolEntry> {
        self.active.get(name)
    }

    /// Metadata of active tools, sorted by name.
    pub fn active_tools(&self) -> Vec<Arc<ToolMetadata>> {
        let mut tools: Vec<Arc<ToolMetadata>> =
            self.active.values().map(|e| e.metadata.clone()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn active_categories(&self) -> Vec<String> {
        self.category_index.keys().cloned().collect()
    }

    pub fn get_statistics(&self) -> ManagerStatistics {
        let now = Instant::now();
        ManagerStatistics {
            total_active: self.active.len(),
            active_categories: self.category_index.len(),
            per_category: self
                .category_index
                .iter()
                .map(|(c, names)| (c.clone(), names.len()))
                .collect(),
            idle_seconds: self
                .active
                .iter()
                .map(|(name, e)| (name.clone(), now.duration_since(e.last_used_at).as_secs()))
                .collect(),
            use_counts: self
                .active
                .iter()
                .map(|(name, e)| (name.clone(), e.use_count))
                .collect(),
            evictions_total: self.evictions_total,
            last_sweep: self.last_sweep,
        }
    }

    // =========================================================================
    // Usage & eviction
    // =========================================================================

    /// Refresh the idle clock of an active tool; no-op otherwise.
    pub fn record_tool_usage(&mut self, name: &str) {
        if let Some(entry) = self.active.get_mut(name) {
            entry.last_used_at = Instant::now();
            entry.use_count += 1;
        }
    }

    /// Remove tools idle longer than the timeout. One notification per batch.
    ///
    /// In-flight calls are unaffected: they already hold their definition.
    pub fn evict_idle(&mut self) -> EvictionReport {
        let now = Instant::now();
        let idle_timeout = self.config.idle_timeout;
        let mut stale: Vec<String> = self
            .active
            .iter()
            .filter(|(_, e)| now.duration_since(e.last_used_at) > idle_timeout)
            .map(|(name, _)| name.clone())
            .collect();
        stale.sort();

        let evicted = self.unregister_tools(stale);
        let swept_at = Utc::now();
        self.last_sweep = Some(swept_at);

        if !evicted.is_empty() {
            self.evictions_total += evicted.len() as u64;
            tracing::info!(
                "idle_tools_evicted: count={} tools={:?}",
                evicted.len(),
                evicted
            );
        }

        EvictionReport { evicted, swept_at }
    }

    // =========================================================================
    // Invocation
    // =========================================================================

    /// Resolve, gate and run `name`, rendering user-facing text.
    ///
    /// Never fails: every error becomes an `isError` result with a hint.
    pub async fn discover_and_use_tool(
        &mut self,
        tracker: &mut UsageTracker,
        name: &str,
        params: Value,
    ) -> CallToolResult {
        match self.invoke(tracker, name, params).await {
            Ok(invocation) => Self::render(name, invocation),
            Err(e) => {
                let category = self.registry.get_tool(name).map(|d| d.category().to_string());
                response::format_error(name, category.as_deref(), &e)
            }
        }
    }

    /// Same pipeline as [`discover_and_use_tool`], returning the engine's
    /// structured result unmodified.
    ///
    /// [`discover_and_use_tool`]: Self::discover_and_use_tool
    pub async fn discover_and_use_tool_raw(
        &mut self,
        tracker: &mut UsageTracker,
        name: &str,
        params: Value,
    ) -> Result<Value> {
        let invocation = self.invoke(tracker, name, params).await?;
        if let Some(warning) = &invocation.warning {
            tracing::info!("workflow_warning: tool={} warning={}", name, warning);
        }
        invocation.outcome
    }

    /// Direct path for `tools/call` on an active tool.
    pub async fn call_active_tool(
        &mut self,
        tracker: &mut UsageTracker,
        name: &str,
        params: Value,
    ) -> CallToolResult {
        if !self.is_active(name) {
            let hint = match self.registry.get_tool(name) {
                Some(definition) => format!(
                    "Tool '{}' is not active. Call register_category with \"{}\" to activate it, \
                     or use discover_and_use_tool.",
                    name,
                    definition.category()
                ),
                None => format!(
                    "Tool '{}' not found. Read unity://categories to discover available tools.",
                    name
                ),
            };
            return CallToolResult::error(hint);
        }
        self.discover_and_use_tool(tracker, name, params).await
    }

    async fn invoke(
        &mut self,
        tracker: &mut UsageTracker,
        name: &str,
        params: Value,
    ) -> Result<Invocation> {
        let definition = self.registry.get_tool(name).cloned().ok_or_else(|| {
            Error::not_found(format!(
                "Tool '{}' not found. Read unity://categories to discover available tools",
                name
            ))
        })?;

        if definition.metadata.is_meta() {
            return Err(Error::misuse(format!(
                "'{}' is a meta tool and cannot be chained through discover_and_use_tool",
                name
            )));
        }

        let normalized = normalize_params(&definition.metadata, params);
        let decision = tracker.check_hierarchical_workflow(name);
        tracker.record_tool_usage(name);
        self.record_tool_usage(name);

        let category = definition.category().to_string();
        if !decision.allowed {
            let message = decision
                .warning
                .unwrap_or_else(|| format!("category '{}' has not been loaded", category));
            tracing::info!("workflow_blocked: tool={} category={}", name, category);
            return Ok(Invocation {
                category,
                warning: None,
                outcome: Err(Error::workflow_violation(message)),
            });
        }

        let outcome = match normalized {
            Ok(mut map) => match check_params(&definition.metadata, &mut map) {
                Ok(()) => self.execute(&definition, map).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            tracing::warn!(
                "tool_execution_failed: tool={} kind={} error={}",
                name,
                e.kind(),
                e
            );
        }

        Ok(Invocation {
            category,
            warning: decision.warning,
            outcome,
        })
    }

    async fn execute(&self, definition: &ToolDefinition, params: Map<String, Value>) -> Result<Value> {
        let name = definition.name();
        match &definition.handler {
            ToolHandler::Local(tool) => {
                tracing::debug!("tool_execute_local: tool={}", name);
                tool.execute(Value::Object(params)).await
            }
            ToolHandler::Engine => {
                tracing::debug!("tool_dispatch_engine: tool={}", name);
                let request = EngineRequest::new(name, Value::Object(params));
                tokio::time::timeout(self.config.request_timeout, self.bridge.send_request(request))
                    .await
                    .map_err(|_| {
                        Error::timeout(format!(
                            "'{}' did not complete within {:?}",
                            name, self.config.request_timeout
                        ))
                    })?
            }
            ToolHandler::Meta => Err(Error::misuse(format!(
                "'{}' is served by the host, not the manager",
                name
            ))),
        }
    }

    fn render(name: &str, invocation: Invocation) -> CallToolResult {
        let Invocation {
            category,
            warning,
            outcome,
        } = invocation;

        let result = match outcome {
            Ok(value) if response::engine_reported_success(&value) => {
                response::format_success(name, &category, &value)
            }
            Ok(value) => response::format_engine_failure(name, &value),
            Err(e) => response::format_error(name, Some(&category), &e),
        };

        match warning {
            Some(warning) => result.prepend(format!("⚠ {}", warning)),
            None => result,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{define_tool, LocalTool, ParamDef, ParamType};
    use crate::workflow::WorkflowPolicy;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;

    /// Bridge returning a fixed response and recording requests.
    #[derive(Default)]
    struct StaticBridge {
        response: Value,
        fail: bool,
        calls: StdMutex<Vec<EngineRequest>>,
    }

    impl StaticBridge {
        fn returning(response: Value) -> Arc<Self> {
            Arc::new(Self {
                response,
                ..Default::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Default::default()
            })
        }

        fn calls(&self) -> Vec<EngineRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EngineBridge for StaticBridge {
        async fn send_request(&self, request: EngineRequest) -> Result<Value> {
            self.calls.lock().unwrap().push(request);
            if self.fail {
                Err(Error::engine("connection refused"))
            } else {
                Ok(self.response.clone())
            }
        }
    }

    struct Echo;

    #[async_trait]
    impl LocalTool for Echo {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(json!({"success": true, "message": "local", "data": params}))
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry
            .register(define_tool(
                ToolMetadata::new("create_script", "scripting", "Create a script")
                    .param(ParamDef::required("scriptName", ParamType::String, "Name")),
                ToolHandler::Engine,
            ))
            .unwrap();
        registry
            .register(define_tool(
                ToolMetadata::new("generate_template", "scripting", "Local template")
                    .param(ParamDef::required("className", ParamType::String, "Class")),
                ToolHandler::Local(Arc::new(Echo)),
            ))
            .unwrap();
        registry
            .register(define_tool(
                ToolMetadata::new("add_rigidbody", "physics", "Add a Rigidbody")
                    .param(ParamDef::required("gameObjectName", ParamType::String, "Target")),
                ToolHandler::Engine,
            ))
            .unwrap();
        registry
            .register(define_tool(
                ToolMetadata::new("search_tools", META_CATEGORY, "Search"),
                ToolHandler::Meta,
            ))
            .unwrap();
        Arc::new(registry)
    }

    fn setup(
        bridge: Arc<dyn EngineBridge>,
        policy: WorkflowPolicy,
    ) -> (
        DynamicToolManager,
        UsageTracker,
        mpsc::UnboundedReceiver<ToolListChanged>,
    ) {
        let registry = registry();
        let (tx, rx) = mpsc::unbounded_channel();
        let manager = DynamicToolManager::new(
            registry.clone(),
            bridge,
            ManagerConfig {
                idle_timeout: Duration::from_secs(300),
                request_timeout: Duration::from_secs(5),
            },
            Some(tx),
        );
        (manager, UsageTracker::new(registry, policy), rx)
    }

    #[tokio::test]
    async fn test_register_category_twice() {
        let (mut manager, _, mut rx) =
            setup(StaticBridge::returning(json!({})), WorkflowPolicy::Warn);

        let first = manager.register_category("scripting");
        assert!(first.success);
        assert_eq!(first.tools_registered, vec!["create_script", "generate_template"]);
        assert!(first.tools_already_registered.is_empty());

        let second = manager.register_category("scripting");
        assert!(second.success);
        assert!(second.tools_registered.is_empty());
        assert_eq!(
            second.tools_already_registered,
            vec!["create_script", "generate_template"]
        );

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_register_unknown_and_meta_category() {
        let (mut manager, _, mut rx) =
            setup(StaticBridge::returning(json!({})), WorkflowPolicy::Warn);

        let unknown = manager.register_category("audio");
        assert!(!unknown.success);
        assert!(unknown.message.contains("physics"));

        let meta = manager.register_category(META_CATEGORY);
        assert!(!meta.success);
        assert_eq!(manager.get_statistics().total_active, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_category_drops_index_entry() {
        let (mut manager, _, mut rx) =
            setup(StaticBridge::returning(json!({})), WorkflowPolicy::Warn);
        manager.register_category("physics");
        let _ = rx.try_recv();

        let result = manager.unregister_category("physics");
        assert!(result.success);
        assert_eq!(result.tools_unregistered, vec!["add_rigidbody"]);
        assert!(manager.active_categories().is_empty());
        assert_eq!(rx.try_recv().unwrap().removed, vec!["add_rigidbody"]);

        let again = manager.unregister_category("physics");
        assert!(!again.success);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_tools_keeps_other_tools() {
        let (mut manager, _, mut rx) =
            setup(StaticBridge::returning(json!({})), WorkflowPolicy::Warn);
        manager.register_category("scripting");
        assert!(rx.try_recv().is_ok());

        let removed =
            manager.unregister_tools(vec!["create_script".to_string(), "nope".to_string()]);
        assert_eq!(removed, vec!["create_script"]);
        assert_eq!(rx.try_recv().unwrap().removed, vec!["create_script"]);
        assert!(manager.is_active("generate_template"));
        assert_eq!(manager.active_categories(), vec!["scripting"]);

        // Nothing left to remove: no notification.
        assert!(manager
            .unregister_tools(vec!["create_script".to_string()])
            .is_empty());
        assert!(rx.try_recv().is_err());

        // Last tool of the category drops the category entry.
        manager.unregister_tools(vec!["generate_template".to_string()]);
        assert!(manager.active_categories().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_does_not_mutate() {
        let bridge = StaticBridge::returning(json!({}));
        let (mut manager, mut tracker, mut rx) = setup(bridge.clone(), WorkflowPolicy::Warn);

        let result = manager
            .discover_and_use_tool(&mut tracker, "no_such_tool", json!({}))
            .await;
        assert!(result.is_error);
        assert!(result.joined_text().contains("unity://categories"));
        assert_eq!(manager.get_statistics().total_active, 0);
        assert!(tracker.snapshot().tool_invocations.is_empty());
        assert!(bridge.calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_meta_tool_rejected_before_dispatch() {
        let bridge = StaticBridge::returning(json!({}));
        let (mut manager, mut tracker, _rx) = setup(bridge.clone(), WorkflowPolicy::Warn);

        let err = manager
            .discover_and_use_tool_raw(&mut tracker, "search_tools", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Misuse(_)));
        assert!(bridge.calls().is_empty());
        assert!(tracker.snapshot().tool_invocations.is_empty());
    }

    #[tokio::test]
    async fn test_raw_returns_engine_result_unchanged() {
        let engine_result = json!({"success": true, "data": {"x": 1}});
        let (mut manager, mut tracker, _rx) =
            setup(StaticBridge::returning(engine_result.clone()), WorkflowPolicy::Warn);

        let raw = manager
            .discover_and_use_tool_raw(
                &mut tracker,
                "add_rigidbody",
                json!({"game_object_name": "Cube"}),
            )
            .await
            .unwrap();
        assert_eq!(raw, engine_result);

        let formatted = manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(!formatted.is_error);
        assert!(formatted.joined_text().contains("\"x\": 1"));
    }

    #[tokio::test]
    async fn test_params_normalized_before_dispatch() {
        let bridge = StaticBridge::returning(json!({"success": true}));
        let (mut manager, mut tracker, _rx) = setup(bridge.clone(), WorkflowPolicy::Warn);

        manager
            .discover_and_use_tool(
                &mut tracker,
                "create_script",
                json!({"SCRIPT_NAME": "Player", "extraFlag": true}),
            )
            .await;

        let calls = bridge.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "create_script");
        assert_eq!(calls[0].params, json!({"scriptName": "Player", "extraFlag": true}));
    }

    #[tokio::test]
    async fn test_block_policy_short_circuits() {
        let bridge = StaticBridge::returning(json!({"success": true}));
        let (mut manager, mut tracker, _rx) = setup(bridge.clone(), WorkflowPolicy::Block);

        let blocked = manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(blocked.is_error);
        assert!(blocked.joined_text().contains("unity://categories/physics"));
        assert!(bridge.calls().is_empty());
        assert_eq!(
            tracker.snapshot().tool_invocations.get("add_rigidbody"),
            Some(&1)
        );

        tracker.record_category_loaded("physics");
        let allowed = manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(!allowed.is_error);
        assert_eq!(bridge.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_warn_policy_prepends_warning() {
        let (mut manager, mut tracker, _rx) =
            setup(StaticBridge::returning(json!({"success": true, "message": "ok"})), WorkflowPolicy::Warn);

        let result = manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.content.len(), 2);
        assert!(result.content[0].text.contains("Workflow warning"));
    }

    #[tokio::test]
    async fn test_bridge_failure_counts_as_usage() {
        let (mut manager, mut tracker, _rx) = setup(StaticBridge::failing(), WorkflowPolicy::Warn);
        manager.register_category("physics");

        let result = manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(result.is_error);
        assert!(result.joined_text().contains("Unity editor is running"));
        assert!(manager.is_active("add_rigidbody"));
        assert_eq!(manager.active_entry("add_rigidbody").unwrap().use_count, 1);
    }

    #[tokio::test]
    async fn test_engine_reported_failure_is_error_result() {
        let (mut manager, mut tracker, _rx) = setup(
            StaticBridge::returning(json!({"success": false, "message": "Cube not found"})),
            WorkflowPolicy::Warn,
        );

        let result = manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(result.is_error);
        assert!(result.joined_text().contains("Cube not found"));
    }

    #[tokio::test]
    async fn test_missing_required_param_is_validation_error() {
        let bridge = StaticBridge::returning(json!({"success": true}));
        let (mut manager, mut tracker, _rx) = setup(bridge.clone(), WorkflowPolicy::Warn);

        let err = manager
            .discover_and_use_tool_raw(&mut tracker, "create_script", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn test_local_tool_never_touches_bridge() {
        let bridge = StaticBridge::returning(json!({}));
        let (mut manager, mut tracker, _rx) = setup(bridge.clone(), WorkflowPolicy::Warn);

        let raw = manager
            .discover_and_use_tool_raw(&mut tracker, "generate_template", json!({"class_name": "Enemy"}))
            .await
            .unwrap();
        assert_eq!(raw["data"]["className"], "Enemy");
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn test_call_active_tool_requires_activation() {
        let (mut manager, mut tracker, _rx) =
            setup(StaticBridge::returning(json!({"success": true})), WorkflowPolicy::Warn);

        let inactive = manager
            .call_active_tool(&mut tracker, "create_script", json!({"scriptName": "A"}))
            .await;
        assert!(inactive.is_error);
        assert!(inactive.joined_text().contains("register_category"));

        manager.register_category("scripting");
        let active = manager
            .call_active_tool(&mut tracker, "create_script", json!({"scriptName": "A"}))
            .await;
        assert!(!active.is_error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_eviction_boundary() {
        let (mut manager, mut tracker, mut rx) =
            setup(StaticBridge::returning(json!({"success": true})), WorkflowPolicy::Warn);
        manager.register_category("scripting");
        manager.register_category("physics");
        let _ = rx.try_recv();
        let _ = rx.try_recv();

        tokio::time::advance(Duration::from_secs(299)).await;
        manager
            .discover_and_use_tool(&mut tracker, "add_rigidbody", json!({"gameObjectName": "Cube"}))
            .await;
        assert!(manager.evict_idle().evicted.is_empty());

        tokio::time::advance(Duration::from_secs(2)).await;
        let report = manager.evict_idle();
        assert_eq!(report.evicted, vec!["create_script", "generate_template"]);
        assert!(manager.is_active("add_rigidbody"));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.removed.len(), 2);
        assert!(rx.try_recv().is_err());

        let stats = manager.get_statistics();
        assert_eq!(stats.evictions_total, 2);
        assert_eq!(stats.total_active, 1);
        assert_eq!(stats.idle_seconds.get("add_rigidbody"), Some(&2));
        assert!(stats.last_sweep.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reactivation_refreshes_idle_clock() {
        let (mut manager, _, _rx) =
            setup(StaticBridge::returning(json!({})), WorkflowPolicy::Warn);
        manager.register_category("physics");

        tokio::time::advance(Duration::from_secs(200)).await;
        manager.register_category("physics");
        tokio::time::advance(Duration::from_secs(200)).await;

        assert!(manager.evict_idle().evicted.is_empty());
    }
}
