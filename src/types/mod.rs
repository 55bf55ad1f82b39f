//! Core types for the MCP bridge.
//!
//! - **IDs**: Strongly-typed identifiers (RequestId, SessionId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for server, lifecycle, workflow and bridge

mod config;
mod errors;
mod ids;

pub use config::{
    parse_duration, BridgeConfig, Config, LifecycleConfig, ObservabilityConfig, ServerConfig,
    WorkflowConfig, ENV_ENGINE_ADDR, ENV_IDLE_TIMEOUT, ENV_WORKFLOW_POLICY,
};
pub use errors::{Error, Result, RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS, RPC_RESOURCE_NOT_FOUND};
pub use ids::{RequestId, SessionId};
