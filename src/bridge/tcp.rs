//! TCP transport to the editor plugin.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use super::codec::{decode_json, read_frame, write_json, MSG_ERROR, MSG_REQUEST, MSG_RESPONSE};
use super::{EngineBridge, EngineRequest};
use crate::types::{BridgeConfig, Error, RequestId, Result};

#[derive(Debug, Serialize)]
struct RequestFrame<'a> {
    id: &'a str,
    method: &'a str,
    params: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ResponseFrame {
    id: String,
    ok: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    message: String,
}

/// Bridge speaking length-prefixed JSON frames over one reused connection.
///
/// The connection is opened lazily. It is taken out of the slot for the
/// duration of an exchange and only put back after a clean response, so an
/// I/O failure or a cancelled call always leads to a fresh connection.
#[derive(Debug)]
pub struct TcpEngineBridge {
    config: BridgeConfig,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpEngineBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            stream: Mutex::new(None),
        }
    }

    pub fn engine_addr(&self) -> &str {
        &self.config.engine_addr
    }

    async fn connect(&self) -> Result<TcpStream> {
        let addr = self.config.engine_addr.as_str();
        let stream = tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "connecting to editor at {} timed out after {:?}",
                    addr, self.config.connect_timeout
                ))
            })?
            .map_err(|e| Error::engine(format!("cannot reach editor at {}: {}", addr, e)))?;
        stream.set_nodelay(true)?;
        tracing::info!("engine_bridge_connected: addr={}", addr);
        Ok(stream)
    }

    async fn exchange(
        &self,
        stream: &mut TcpStream,
        request_id: &RequestId,
        request: &EngineRequest,
    ) -> std::io::Result<(u8, ResponseFrame)> {
        let frame = RequestFrame {
            id: request_id.as_str(),
            method: &request.method,
            params: &request.params,
        };
        write_json(stream, MSG_REQUEST, &frame).await?;

        let (msg_type, payload) = read_frame(stream, self.config.max_frame_bytes)
            .await?
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "connection closed by editor",
                )
            })?;
        Ok((msg_type, decode_json(&payload)?))
    }
}

#[async_trait]
impl EngineBridge for TcpEngineBridge {
    async fn send_request(&self, request: EngineRequest) -> Result<Value> {
        let mut slot = self.stream.lock().await;
        let mut stream = match slot.take() {
            Some(stream) => stream,
            None => self.connect().await?,
        };

        let request_id = RequestId::new();
        tracing::debug!(
            "engine_request: id={} method={}",
            request_id,
            request.method
        );

        let (msg_type, response) = match self.exchange(&mut stream, &request_id, &request).await {
            Ok(exchanged) => exchanged,
            Err(e) => {
                tracing::warn!(
                    "engine_bridge_io_failed: method={} error={}",
                    request.method,
                    e
                );
                return Err(Error::engine(format!(
                    "bridge I/O failure during '{}': {}",
                    request.method, e
                )));
            }
        };

        if response.id != request_id.as_str() {
            tracing::warn!(
                "engine_response_id_mismatch: expected={} got={}",
                request_id,
                response.id
            );
            return Err(Error::internal(format!(
                "editor answered request {} with id {}",
                request_id, response.id
            )));
        }

        *slot = Some(stream);

        match (msg_type, response.ok) {
            (MSG_RESPONSE, true) => Ok(response.result),
            (MSG_RESPONSE, false) | (MSG_ERROR, _) => {
                let (code, message) = response
                    .error
                    .map(|e| (e.code, e.message))
                    .unwrap_or((Value::Null, "unknown editor error".to_string()));
                let code = match code {
                    Value::Null => String::from("ERROR"),
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Err(Error::engine(format!("{}: {}", code, message)))
            }
            (other, _) => Err(Error::internal(format!(
                "unexpected frame type 0x{:02X} from editor",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn config_for(addr: String) -> BridgeConfig {
        BridgeConfig {
            engine_addr: addr,
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
            max_frame_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn test_unreachable_editor_is_engine_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let bridge = TcpEngineBridge::new(config_for(addr));
        let err = bridge
            .send_request(EngineRequest::new("create_script", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Engine(_)), "got {:?}", err);
    }

    #[test]
    fn test_request_frame_shape() {
        let params = json!({"scriptName": "Player"});
        let frame = RequestFrame {
            id: "abc",
            method: "create_script",
            params: &params,
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"id": "abc", "method": "create_script", "params": {"scriptName": "Player"}})
        );
    }
}
