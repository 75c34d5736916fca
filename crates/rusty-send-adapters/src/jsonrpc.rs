use serde_json::Value;

use rusty_send_core::PortError;

#[derive(Debug, Clone)]
pub(crate) struct JsonRpcBridge {
    label: &'static str,
    url: String,
    client: reqwest::blocking::Client,
}

impl JsonRpcBridge {
    pub(crate) fn new(label: &'static str, url: String, client: reqwest::blocking::Client) -> Self {
        Self { label, url, client }
    }

    pub(crate) fn call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let label = self.label;
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!(bridge = label, %method, "json-rpc call");
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("{label} request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(PortError::Transport(format!(
                "{label} status {status}: {}",
                text.trim()
            )));
        }
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("{label} json decode failed: {e}")))?;
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned)
                .unwrap_or_else(|| err.to_string());
            return Err(PortError::Policy(format!("{label} returned error: {message}")));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport(format!("{label} missing result")))
    }
}
