//! Unity MCP server - main entry point.
//!
//! Speaks MCP over stdin/stdout and forwards tool calls to the Unity editor
//! plugin over TCP. Logs go to stderr.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::{mpsc, Mutex};

use unity_mcp::bridge::{EngineBridge, TcpEngineBridge};
use unity_mcp::host::{EvictionService, ToolHost};
use unity_mcp::mcp::McpServer;
use unity_mcp::types::parse_duration;
use unity_mcp::workflow::WorkflowPolicy;
use unity_mcp::{catalog, observability, Config};

#[derive(Debug, Parser)]
#[command(name = "unity-mcp", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(long, env = "UNITY_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Editor plugin address (host:port).
    #[arg(long)]
    engine_addr: Option<String>,

    /// Workflow gate policy: warn or block.
    #[arg(long)]
    workflow_policy: Option<WorkflowPolicy>,

    /// Idle time before an active tool is evicted (e.g. "5m").
    #[arg(long, value_parser = parse_duration)]
    idle_timeout: Option<Duration>,

    /// Emit JSON logs.
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(addr) = self.engine_addr {
            config.bridge.engine_addr = addr;
        }
        if let Some(policy) = self.workflow_policy {
            config.workflow.policy = policy;
        }
        if let Some(idle_timeout) = self.idle_timeout {
            config.lifecycle.idle_timeout = idle_timeout;
        }
        if self.json_logs {
            config.observability.json_logs = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // File, then environment, then flags
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    observability::init_tracing(&config.observability);

    let registry = Arc::new(catalog::build_registry());
    let bridge: Arc<dyn EngineBridge> = Arc::new(TcpEngineBridge::new(config.bridge.clone()));
    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    let host = Arc::new(Mutex::new(ToolHost::new(
        registry,
        bridge,
        &config,
        Some(changes_tx),
    )));

    tracing::info!(
        "unity_mcp_starting: version={} engine_addr={} policy={} idle_timeout={:?}",
        config.server.version,
        config.bridge.engine_addr,
        config.workflow.policy,
        config.lifecycle.idle_timeout
    );

    let mut eviction = EvictionService::new(host.clone(), config.lifecycle.sweep_interval);
    let eviction_handle = eviction.start();

    let server = McpServer::new(host, config.server.clone());
    let cancel = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown_signal_received");
            cancel.cancel();
        }
    });

    let served = server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), changes_rx)
        .await;

    eviction.stop();
    let _ = eviction_handle.await;
    tracing::info!("unity_mcp_stopped");

    served?;
    Ok(())
}
