//! Observability utilities.

use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Environment variable forcing JSON log output.
pub const ENV_LOG_FORMAT: &str = "UNITY_MCP_LOG_FORMAT";

/// Initialize tracing subscriber once for the process.
///
/// Logs always go to stderr: stdout carries the MCP protocol stream.
/// Format follows `config.json_logs` and can be forced to JSON via
/// `UNITY_MCP_LOG_FORMAT=json`. `RUST_LOG` overrides `config.log_level`.
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        let format_override = std::env::var(ENV_LOG_FORMAT).ok();
        let json = wants_json(config, format_override.as_deref());

        if let Err(err) = tracing::subscriber::set_global_default(build_subscriber(env_filter, json)) {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

fn wants_json(config: &ObservabilityConfig, format_override: Option<&str>) -> bool {
    config.json_logs || format_override.is_some_and(|v| v.eq_ignore_ascii_case("json"))
}

fn build_subscriber(env_filter: EnvFilter, json: bool) -> Box<dyn Subscriber + Send + Sync> {
    if json {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr)),
        )
    }
}
