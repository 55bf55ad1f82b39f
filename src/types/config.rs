//! Configuration structures.
//!
//! Configuration is loaded from an optional TOML file, then environment
//! variables, then CLI flags (highest precedence, applied by the binary).

use humantime_serde::re::humantime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::types::{Error, Result};
use crate::workflow::WorkflowPolicy;

/// Environment variable overriding `bridge.engine_addr`.
pub const ENV_ENGINE_ADDR: &str = "UNITY_MCP_ENGINE_ADDR";
/// Environment variable overriding `workflow.policy`.
pub const ENV_WORKFLOW_POLICY: &str = "UNITY_MCP_WORKFLOW_POLICY";
/// Environment variable overriding `lifecycle.idle_timeout`.
pub const ENV_IDLE_TIMEOUT: &str = "UNITY_MCP_IDLE_TIMEOUT";

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server identity reported on `initialize`.
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Tool activation lifecycle.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Discovery workflow gate.
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Engine bridge transport.
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Server identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "unity-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Tool activation lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Active tools idle longer than this are evicted.
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,

    /// How often the eviction sweep runs.
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Workflow gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub policy: WorkflowPolicy,
}

/// Engine bridge transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Editor plugin listen address (TCP).
    pub engine_addr: String,

    /// Deadline for establishing the TCP connection.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Deadline for a single request/response exchange. An unresponsive
    /// editor can never stall a tool call longer than this.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Maximum frame payload size in bytes.
    pub max_frame_bytes: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            engine_addr: "127.0.0.1:6400".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            max_frame_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration: file (if given), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(format!("invalid TOML: {}", e)))
    }

    /// Apply `UNITY_MCP_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var(ENV_ENGINE_ADDR) {
            self.bridge.engine_addr = addr;
        }
        if let Ok(policy) = std::env::var(ENV_WORKFLOW_POLICY) {
            self.workflow.policy = policy.parse()?;
        }
        if let Ok(timeout) = std::env::var(ENV_IDLE_TIMEOUT) {
            self.lifecycle.idle_timeout = parse_duration(&timeout)?;
        }
        Ok(())
    }

    /// Reject values that would make the server misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.bridge.engine_addr.trim().is_empty() {
            return Err(Error::config("bridge.engine_addr cannot be empty"));
        }
        if self.lifecycle.idle_timeout.is_zero() {
            return Err(Error::config("lifecycle.idle_timeout must be positive"));
        }
        if self.lifecycle.sweep_interval.is_zero() {
            return Err(Error::config("lifecycle.sweep_interval must be positive"));
        }
        if self.bridge.request_timeout.is_zero() {
            return Err(Error::config("bridge.request_timeout must be positive"));
        }
        if self.bridge.max_frame_bytes == 0 {
            return Err(Error::config("bridge.max_frame_bytes must be positive"));
        }
        Ok(())
    }
}

/// Parse a humantime duration (`"90s"`, `"5m"`, `"1h 30m"`).
pub fn parse_duration(raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim())
        .map_err(|e| Error::config(format!("invalid duration '{}': {}", raw, e)))
}
