#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Method, Response, Server, StatusCode};

use rusty_send_adapters::{RuntimeProfile, TransferAdapterConfig};
use rusty_send_core::ChainConfig;

pub const RECIPIENT: &str = "cosmos1recipient000000000000000000000000000";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub body: Value,
}

impl RecordedCall {
    /// JSON-RPC method name when the call was a bridge request.
    pub fn rpc_method(&self) -> Option<&str> {
        self.body.get("method").and_then(Value::as_str)
    }
}

pub type Calls = Arc<Mutex<Vec<RecordedCall>>>;

/// Serves up to `max_requests` requests, answering each with `route`.
pub fn spawn_mock_server<F>(max_requests: usize, route: F) -> (String, Calls)
where
    F: Fn(&Method, &str, &Value) -> (u16, Value) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());
    let calls: Calls = Arc::default();
    let recorded = Arc::clone(&calls);

    thread::spawn(move || {
        for _ in 0..max_requests {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let method = req.method().clone();
            let path = req.url().to_owned();
            let mut raw = String::new();
            let _ = req.as_reader().read_to_string(&mut raw);
            let body = serde_json::from_str(&raw).unwrap_or(Value::Null);

            let (code, payload) = route(&method, &path, &body);
            if let Ok(mut g) = recorded.lock() {
                g.push(RecordedCall {
                    method: method.to_string(),
                    path,
                    body,
                });
            }
            // String payloads are sent raw so routes can answer with non-JSON bodies.
            let text = match payload {
                Value::String(raw) => raw,
                other => other.to_string(),
            };
            let response = Response::from_string(text).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    (addr, calls)
}

pub fn rpc_result(body: &Value, result: Value) -> (u16, Value) {
    (
        200,
        json!({"jsonrpc": "2.0", "id": body.get("id").cloned().unwrap_or(json!(1)), "result": result}),
    )
}

pub fn rpc_error(body: &Value, message: &str) -> (u16, Value) {
    (
        200,
        json!({
            "jsonrpc": "2.0",
            "id": body.get("id").cloned().unwrap_or(json!(1)),
            "error": {"code": 4001, "message": message}
        }),
    )
}

pub fn dev_config() -> TransferAdapterConfig {
    TransferAdapterConfig {
        balance_http_enabled: false,
        ..TransferAdapterConfig::default()
    }
}

pub fn http_config(base_url: &str) -> TransferAdapterConfig {
    TransferAdapterConfig {
        runtime_profile: RuntimeProfile::Production,
        chain: ChainConfig {
            rest_endpoint: format!("{base_url}/"),
            rpc_endpoint: "http://rpc.test".to_owned(),
            ..ChainConfig::default()
        },
        wallet_bridge_url: Some(format!("{base_url}/wallet")),
        signing_bridge_url: Some(format!("{base_url}/signing")),
        balance_http_enabled: true,
        http_timeout_ms: 5_000,
    }
}

pub fn calls_of(calls: &Calls) -> Vec<RecordedCall> {
    calls.lock().expect("calls lock").clone()
}
