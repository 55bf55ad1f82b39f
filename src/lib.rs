//! # Unity MCP - dynamic tool bridge to the Unity editor
//!
//! Exposes editor operations (animation, physics, scene, scripting, UI) to an
//! AI assistant over the Model Context Protocol, while keeping the advertised
//! tool list small:
//! - Static tool registry with category index and discovery resources
//! - Dynamic activation of whole categories, with idle eviction
//! - Workflow gate that warns about or blocks undiscovered tool calls
//! - Parameter casing normalization and schema validation
//! - Engine bridge to the editor plugin over length-prefixed TCP frames
//!
//! ## Architecture
//!
//! A single `ToolHost` owns all mutable state behind one async mutex:
//! ```text
//!                    ┌─────────────────────────────────┐
//!   MCP (stdio)  →   │            ToolHost             │
//!                    │  ┌─────────┐ ┌─────────────┐    │
//!                    │  │  Usage  │ │   Dynamic   │ ───┼──→ EngineBridge
//!                    │  │ Tracker │ │ToolManager  │    │    (editor, TCP)
//!                    │  └─────────┘ └─────────────┘    │
//!                    │       ToolRegistry (Arc, RO)    │
//!                    └─────────────────────────────────┘
//!                          ↑ EvictionService (timer)
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod bridge;
pub mod catalog;
pub mod host;
pub mod manager;
pub mod mcp;
pub mod tools;
pub mod types;
pub mod workflow;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
