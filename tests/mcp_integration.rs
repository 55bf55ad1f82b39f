//! MCP server integration tests: a scripted client talking JSON-RPC lines to
//! `McpServer::serve` over in-memory pipes.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use unity_mcp::bridge::{EngineBridge, EngineRequest};
use unity_mcp::catalog;
use unity_mcp::host::ToolHost;
use unity_mcp::manager::ManagerConfig;
use unity_mcp::mcp::{McpServer, TOOLS_LIST_CHANGED};
use unity_mcp::types::ServerConfig;
use unity_mcp::workflow::WorkflowPolicy;

/// Editor stand-in that reports every request as done.
#[derive(Debug)]
struct EchoEditor;

#[async_trait]
impl EngineBridge for EchoEditor {
    async fn send_request(&self, request: EngineRequest) -> unity_mcp::Result<Value> {
        Ok(json!({
            "success": true,
            "message": format!("{} done", request.method),
            "data": request.params,
        }))
    }
}

struct TestClient {
    writer: DuplexStream,
    lines: Lines<BufReader<DuplexStream>>,
    next_id: u64,
}

impl TestClient {
    async fn send(&mut self, message: Value) {
        let mut line = serde_json::to_string(&message).unwrap();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("server did not answer in time")
            .unwrap()
            .expect("server closed the stream");
        serde_json::from_str(&line).unwrap()
    }

    /// Send a request and return its response.
    async fn request(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        self.send(json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await;
        let response = self.recv().await;
        assert_eq!(response["id"], id, "response out of order: {}", response);
        response
    }

    async fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        let response = self
            .request("tools/call", json!({"name": name, "arguments": arguments}))
            .await;
        response["result"].clone()
    }
}

fn start_server() -> (TestClient, JoinHandle<std::io::Result<()>>) {
    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    let host = ToolHost::with_settings(
        Arc::new(catalog::build_registry()),
        Arc::new(EchoEditor),
        ManagerConfig {
            idle_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(5),
        },
        WorkflowPolicy::Warn,
        Some(changes_tx),
    );
    let server = McpServer::new(Arc::new(Mutex::new(host)), ServerConfig::default());

    let (client_writer, server_reader) = tokio::io::duplex(64 * 1024);
    let (server_writer, client_reader) = tokio::io::duplex(64 * 1024);

    let handle = tokio::spawn(async move {
        server
            .serve(BufReader::new(server_reader), server_writer, changes_rx)
            .await
    });

    let client = TestClient {
        writer: client_writer,
        lines: BufReader::new(client_reader).lines(),
        next_id: 0,
    };
    (client, handle)
}

fn tool_names(list_response: &Value) -> Vec<String> {
    list_response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

fn text_of(result: &Value) -> String {
    result["content"][0]["text"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_initialize_handshake() {
    let (mut client, _server) = start_server();

    let response = client
        .request(
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "integration-test", "version": "0"},
            }),
        )
        .await;
    let result = &response["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], true);
    assert_eq!(result["serverInfo"]["name"], "unity-mcp");

    // Notifications are not answered; the next response must be the ping's.
    client
        .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;
    let pong = client.request("ping", json!({})).await;
    assert_eq!(pong["result"], json!({}));
}

#[tokio::test]
async fn test_discovery_activation_and_call() {
    let (mut client, _server) = start_server();
    client.request("initialize", json!({})).await;

    let initial = client.request("tools/list", json!({})).await;
    let names = tool_names(&initial);
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"register_category".to_string()));
    assert!(!names.contains(&"create_script".to_string()));

    let overview = client
        .request("resources/read", json!({"uri": "unity://categories"}))
        .await;
    let overview: Value =
        serde_json::from_str(overview["result"]["contents"][0]["text"].as_str().unwrap()).unwrap();
    let categories: Vec<&str> = overview["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["animation", "physics", "scene", "scripting", "ui"]);

    let activation = client
        .call_tool("register_category", json!({"category": "scripting"}))
        .await;
    assert_eq!(activation["isError"], false);

    let changed = client.recv().await;
    assert_eq!(changed["method"], TOOLS_LIST_CHANGED);
    assert!(changed.get("id").is_none());

    let after = client.request("tools/list", json!({})).await;
    let names = tool_names(&after);
    assert!(names.contains(&"create_script".to_string()));
    assert!(names.contains(&"generate_script_template".to_string()));

    let created = client
        .call_tool("create_script", json!({"scriptName": "Enemy"}))
        .await;
    assert_eq!(created["isError"], false);
    assert!(text_of(&created).contains("create_script done"));
}

#[tokio::test]
async fn test_reactivation_sends_no_notification() {
    let (mut client, _server) = start_server();

    client
        .call_tool("register_category", json!({"category": "ui"}))
        .await;
    assert_eq!(client.recv().await["method"], TOOLS_LIST_CHANGED);

    let again = client
        .call_tool("register_category", json!({"category": "ui"}))
        .await;
    let again: Value = serde_json::from_str(&text_of(&again)).unwrap();
    assert!(again["toolsRegistered"].as_array().unwrap().is_empty());

    // The next line must be the ping response, not a notification.
    let pong = client.request("ping", json!({})).await;
    assert_eq!(pong["result"], json!({}));
}

#[tokio::test]
async fn test_inactive_tool_call_points_at_activation() {
    let (mut client, _server) = start_server();

    let result = client
        .call_tool("add_rigidbody", json!({"gameObjectName": "Crate"}))
        .await;
    assert_eq!(result["isError"], true);
    assert!(text_of(&result).contains("register_category"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let (mut client, _server) = start_server();

    client.writer.write_all(b"{broken\n").await.unwrap();
    let parse_error = client.recv().await;
    assert_eq!(parse_error["error"]["code"], -32700);

    let unknown = client.request("prompts/list", json!({})).await;
    assert_eq!(unknown["error"]["code"], -32601);

    let missing = client
        .request("resources/read", json!({"uri": "unity://categories/weather"}))
        .await;
    assert_eq!(missing["error"]["code"], -32002);
}

#[tokio::test]
async fn test_eof_stops_server() {
    let (client, server) = start_server();
    drop(client);

    let served = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop on EOF")
        .unwrap();
    assert!(served.is_ok());
}
