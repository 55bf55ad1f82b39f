//! Engine bridge - the narrow contract to the running editor.
//!
//! The manager only ever calls [`EngineBridge::send_request`]. The shipped
//! transport is [`TcpEngineBridge`]; tests substitute mocks.

pub mod codec;
pub mod tcp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Result;

pub use tcp::TcpEngineBridge;

/// A `{method, params}` request for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub method: String,
    pub params: Value,
}

impl EngineRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Sends requests to the editor process.
///
/// Returns the engine's structured result (commonly
/// `{success, message, data?}`) or a transport/engine error.
#[async_trait]
pub trait EngineBridge: Send + Sync {
    async fn send_request(&self, request: EngineRequest) -> Result<Value>;
}
