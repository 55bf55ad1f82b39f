//! MCP surface: JSON-RPC 2.0 over line-delimited stdio.
//!
//! Methods: `initialize`, `ping`, `tools/list`, `tools/call`,
//! `resources/list`, `resources/templates/list`, `resources/read`.
//! Tool-list changes are pushed as `notifications/tools/list_changed`.

pub mod handlers;
pub mod protocol;
pub mod router;
pub mod server;

pub use server::{McpServer, TOOLS_LIST_CHANGED};
