//! MCP method handlers, one module per method group.

pub mod lifecycle;
pub mod resources;
pub mod tools;
