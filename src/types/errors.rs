//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Tool-level
//! failures are converted into `isError` results at the manager boundary;
//! only protocol-level failures map to JSON-RPC error codes.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC: invalid params.
pub const RPC_INVALID_PARAMS: i64 = -32602;
/// JSON-RPC: internal error.
pub const RPC_INTERNAL_ERROR: i64 = -32603;
/// MCP: resource not found.
pub const RPC_RESOURCE_NOT_FOUND: i64 = -32002;

/// Main error enum for the MCP bridge.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing parameters, caught before any dispatch.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown tool, category or resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Discovery workflow gate blocked the call.
    #[error("workflow violation: {0}")]
    WorkflowViolation(String),

    /// Meta tool routed through the indirect dispatch path.
    #[error("misuse: {0}")]
    Misuse(String),

    /// Engine reported a failure or the bridge transport failed.
    #[error("engine error: {0}")]
    Engine(String),

    /// Bridge call exceeded its deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map to a JSON-RPC error code for protocol-level failures.
    pub fn to_rpc_error_code(&self) -> i64 {
        match self {
            Error::Validation(_) | Error::Misuse(_) | Error::WorkflowViolation(_) => {
                RPC_INVALID_PARAMS
            }
            Error::NotFound(_) => RPC_RESOURCE_NOT_FOUND,
            Error::Engine(_)
            | Error::Timeout(_)
            | Error::Config(_)
            | Error::Internal(_)
            | Error::Serialization(_)
            | Error::Io(_) => RPC_INTERNAL_ERROR,
        }
    }

    /// Short machine-readable kind, used in logs and error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::WorkflowViolation(_) => "workflow_violation",
            Error::Misuse(_) => "misuse",
            Error::Engine(_) => "engine",
            Error::Timeout(_) => "timeout",
            Error::Config(_) => "config",
            Error::Internal(_) => "internal",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn workflow_violation(msg: impl Into<String>) -> Self {
        Self::WorkflowViolation(msg.into())
    }

    pub fn misuse(msg: impl Into<String>) -> Self {
        Self::Misuse(msg.into())
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes() {
        assert_eq!(Error::validation("x").to_rpc_error_code(), RPC_INVALID_PARAMS);
        assert_eq!(Error::not_found("x").to_rpc_error_code(), RPC_RESOURCE_NOT_FOUND);
        assert_eq!(Error::engine("x").to_rpc_error_code(), RPC_INTERNAL_ERROR);
    }

    #[test]
    fn test_display_includes_kind_prefix() {
        let err = Error::misuse("meta tools must be called directly");
        assert_eq!(err.to_string(), "misuse: meta tools must be called directly");
        assert_eq!(err.kind(), "misuse");
    }
}
