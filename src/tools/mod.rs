//! Tool infrastructure - descriptors, parameter handling, registry.
//!
//! Descriptors are plain data bound to a handler with [`define_tool`]. The
//! registry is built once at startup and never mutated afterwards; activation
//! state lives in the manager.

pub mod descriptor;
pub mod params;
pub mod registry;

pub use descriptor::{
    define_tool, LocalTool, ParamDef, ParamType, ToolDefinition, ToolHandler, ToolMetadata,
    META_CATEGORY,
};
pub use params::{check_params, normalize_param_keys, normalize_params};
pub use registry::{RegistryStatistics, ToolRegistry};
