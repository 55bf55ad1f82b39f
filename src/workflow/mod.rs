//! Discovery workflow gate.
//!
//! Nudges (or forces) the assistant through "browse categories → load one
//! category → invoke tool". One policy applies uniformly to every tool.

pub mod state;
pub mod tracker;

pub use state::{ResourceAccess, WorkflowDecision, WorkflowPhase, WorkflowPolicy, WorkflowState};
pub use tracker::{UsageTracker, WorkflowSnapshot};
