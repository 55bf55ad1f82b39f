//! Line-delimited JSON-RPC server over any async reader/writer pair.
//!
//! stdin/stdout in production, `tokio::io::duplex` in tests. One message per
//! line; requests are handled sequentially under the host lock.

use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::host::ToolHost;
use crate::manager::ToolListChanged;
use crate::mcp::protocol::{
    notification, JsonRpcMessage, JsonRpcResponse, RpcError, INVALID_REQUEST, JSONRPC_VERSION,
    PARSE_ERROR,
};
use crate::mcp::router;
use crate::types::ServerConfig;

pub const TOOLS_LIST_CHANGED: &str = "notifications/tools/list_changed";

/// MCP server wrapping the tool host.
#[derive(Debug)]
pub struct McpServer {
    host: Arc<Mutex<ToolHost>>,
    server: ServerConfig,
    cancel: CancellationToken,
}

impl McpServer {
    pub fn new(host: Arc<Mutex<ToolHost>>, server: ServerConfig) -> Self {
        Self {
            host,
            server,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Serve until EOF on `reader` or cancellation.
    ///
    /// Tool-list changes arriving on `changes` are forwarded as
    /// `notifications/tools/list_changed`.
    pub async fn serve<R, W>(
        &self,
        reader: R,
        mut writer: W,
        mut changes: mpsc::UnboundedReceiver<ToolListChanged>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut changes_open = true;
        tracing::info!("mcp_server_started: name={}", self.server.name);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("mcp_server_cancelled");
                    break;
                }
                change = changes.recv(), if changes_open => match change {
                    Some(change) => write_change(&mut writer, &change).await?,
                    None => changes_open = false,
                },
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::info!("mcp_server_eof");
                        break;
                    };
                    if let Some(response) = self.handle_line(&line).await {
                        write_message(&mut writer, &response).await?;
                    }
                    while let Ok(change) = changes.try_recv() {
                        write_change(&mut writer, &change).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Handle one raw line. Returns the response to write, if any.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("mcp_parse_error: {}", e);
                return to_value(JsonRpcResponse::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let id = raw.get("id").cloned();
        let message: JsonRpcMessage = match serde_json::from_value(raw) {
            Ok(message) => message,
            Err(e) => {
                return to_value(JsonRpcResponse::failure(
                    id.unwrap_or(Value::Null),
                    RpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                ));
            }
        };

        if message.is_notification() {
            self.handle_notification(&message);
            return None;
        }
        let id = message.id.clone().unwrap_or_default();

        if message.jsonrpc != JSONRPC_VERSION {
            return to_value(JsonRpcResponse::failure(
                id,
                RpcError::new(INVALID_REQUEST, "Invalid JSON-RPC version"),
            ));
        }

        tracing::debug!("mcp_request: method={} id={}", message.method, id);
        let params = message.params_or_empty();
        let result = {
            let mut host = self.host.lock().await;
            router::route_request(&mut host, &self.server, &message.method, params).await
        };

        let response = match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                tracing::debug!(
                    "mcp_request_failed: method={} code={} message={}",
                    message.method,
                    error.code,
                    error.message
                );
                JsonRpcResponse::failure(id, error)
            }
        };
        to_value(response)
    }

    fn handle_notification(&self, message: &JsonRpcMessage) {
        match message.method.as_str() {
            "notifications/initialized" => tracing::info!("mcp_client_initialized"),
            "notifications/cancelled" => {
                tracing::debug!("mcp_request_cancelled: params={:?}", message.params)
            }
            other => tracing::debug!("mcp_notification_ignored: method={}", other),
        }
    }
}

fn to_value(response: JsonRpcResponse) -> Option<Value> {
    match serde_json::to_value(response) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("mcp_response_encoding_failed: {}", e);
            None
        }
    }
}

async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, message: &Value) -> std::io::Result<()> {
    let mut line = serde_json::to_string(message)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

async fn write_change<W: AsyncWrite + Unpin>(
    writer: &mut W,
    change: &ToolListChanged,
) -> std::io::Result<()> {
    tracing::debug!(
        "tool_list_changed: added={} removed={}",
        change.added.len(),
        change.removed.len()
    );
    write_message(writer, &notification(TOOLS_LIST_CHANGED, None)).await
}
