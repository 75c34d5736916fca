use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use sha2::{Digest, Sha256};

use rusty_send_core::{
    BroadcastResponse, MsgSend, OfflineSigner, PortError, SigningClientPort, StdFee, StdSignDoc,
    StdTx,
};

use crate::jsonrpc::JsonRpcBridge;
use crate::TransferAdapterConfig;

const BROADCAST_MODE: &str = "sync";

#[derive(Debug, Clone)]
pub struct SigningClientAdapter {
    chain_id: String,
    mode: SigningMode,
}

#[derive(Debug, Clone)]
enum SigningMode {
    Disabled(String),
    Deterministic(Arc<Mutex<DeterministicLedger>>),
    Http(HttpRuntime),
}

#[derive(Debug, Default)]
struct DeterministicLedger {
    sequences: HashMap<String, u64>,
    broadcasts: Vec<StdTx>,
}

#[derive(Debug, Clone)]
struct HttpRuntime {
    rest_endpoint: String,
    rpc_endpoint: String,
    client: reqwest::blocking::Client,
    bridge: JsonRpcBridge,
}

impl Default for SigningClientAdapter {
    fn default() -> Self {
        Self::with_config(TransferAdapterConfig::from_env())
    }
}

impl SigningClientAdapter {
    pub fn with_config(config: TransferAdapterConfig) -> Self {
        let mode = match config.signing_bridge_url.as_ref() {
            Some(url) => match config.http_client() {
                Ok(client) => SigningMode::Http(HttpRuntime {
                    rest_endpoint: config.chain.rest_endpoint.trim_end_matches('/').to_owned(),
                    rpc_endpoint: config.chain.rpc_endpoint.clone(),
                    bridge: JsonRpcBridge::new("signing bridge", url.clone(), client.clone()),
                    client,
                }),
                Err(e) => SigningMode::Disabled(format!("failed to initialize signing client: {e}")),
            },
            None if config.strict_runtime_required() => {
                SigningMode::Disabled("signing bridge not configured".to_owned())
            }
            None => {
                tracing::warn!("no signing bridge configured; broadcasts stay in-process");
                SigningMode::Deterministic(Arc::default())
            }
        };
        Self {
            chain_id: config.chain.chain_id,
            mode,
        }
    }

    /// Transactions accepted by the deterministic broadcaster, oldest first.
    pub fn broadcasts(&self) -> Result<Vec<StdTx>, PortError> {
        match &self.mode {
            SigningMode::Deterministic(ledger) => Ok(lock_ledger(ledger)?.broadcasts.clone()),
            _ => Err(PortError::NotImplemented(
                "broadcast history is only kept by the deterministic client",
            )),
        }
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let SigningMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn account_numbers(&self, address: &str) -> Result<(String, String), PortError> {
        match &self.mode {
            SigningMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            SigningMode::Deterministic(ledger) => {
                let g = lock_ledger(ledger)?;
                let sequence = g.sequences.get(address).copied().unwrap_or(0);
                Ok(("0".to_owned(), sequence.to_string()))
            }
            SigningMode::Http(runtime) => runtime.fetch_account(address),
        }
    }

    fn broadcast(&self, signer_address: &str, tx: StdTx) -> Result<BroadcastResponse, PortError> {
        match &self.mode {
            SigningMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            SigningMode::Deterministic(ledger) => {
                let encoded = serde_json::to_vec(&tx)
                    .map_err(|e| PortError::Validation(format!("tx serialization failed: {e}")))?;
                let transaction_hash = hex::encode_upper(Sha256::digest(&encoded));
                let mut g = lock_ledger(ledger)?;
                *g.sequences.entry(signer_address.to_owned()).or_insert(0) += 1;
                g.broadcasts.push(tx);
                Ok(BroadcastResponse {
                    transaction_hash,
                    code: 0,
                    height: Some(g.broadcasts.len() as u64),
                    raw_log: String::new(),
                })
            }
            SigningMode::Http(runtime) => runtime.broadcast(&self.chain_id, &tx),
        }
    }
}

impl SigningClientPort for SigningClientAdapter {
    fn sign_and_broadcast<S: OfflineSigner>(
        &self,
        signer: &S,
        signer_address: &str,
        messages: &[MsgSend],
        fee: &StdFee,
        memo: &str,
    ) -> Result<BroadcastResponse, PortError> {
        self.check_mode()?;
        if messages.is_empty() {
            return Err(PortError::Validation("at least one message is required".to_owned()));
        }
        let msgs = messages
            .iter()
            .map(MsgSend::to_amino)
            .collect::<Result<Vec<_>, _>>()?;

        let (account_number, sequence) = self.account_numbers(signer_address)?;
        let doc = StdSignDoc {
            account_number,
            chain_id: self.chain_id.clone(),
            fee: fee.clone(),
            memo: memo.to_owned(),
            msgs,
            sequence,
        };

        let response = signer.sign_amino(signer_address, &doc)?;
        // The wallet may adjust the fee, never the messages or the target chain.
        if response.signed.chain_id != doc.chain_id || response.signed.msgs != doc.msgs {
            return Err(PortError::Validation(
                "wallet returned a sign doc with altered messages".to_owned(),
            ));
        }

        let result = self.broadcast(signer_address, StdTx::from_signed(response))?;
        tracing::info!(
            tx_hash = %result.transaction_hash,
            height = ?result.height,
            "transaction broadcast"
        );
        Ok(result)
    }
}

impl HttpRuntime {
    fn fetch_account(&self, address: &str) -> Result<(String, String), PortError> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{address}", self.rest_endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PortError::Transport(format!("account request failed: {e}")))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(format!(
                "account {address} does not exist on chain yet"
            )));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "account request returned status {status}"
            )));
        }
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("account json decode failed: {e}")))?;
        body.get("account")
            .and_then(account_numbers_from_json)
            .ok_or_else(|| PortError::Transport("account response missing account_number".to_owned()))
    }

    fn broadcast(&self, chain_id: &str, tx: &StdTx) -> Result<BroadcastResponse, PortError> {
        let tx_json = serde_json::to_value(tx)
            .map_err(|e| PortError::Validation(format!("tx serialization failed: {e}")))?;
        let result = self.bridge.call(
            "broadcast_tx_sync",
            serde_json::json!({
                "chainId": chain_id,
                "rpcEndpoint": self.rpc_endpoint,
                "tx": tx_json,
                "mode": BROADCAST_MODE,
            }),
        )?;
        let response = broadcast_response_from_json(&result)?;
        if response.code != 0 {
            return Err(PortError::Rejected(format!(
                "code {}: {}",
                response.code, response.raw_log
            )));
        }
        Ok(response)
    }
}

fn lock_ledger(
    ledger: &Mutex<DeterministicLedger>,
) -> Result<MutexGuard<'_, DeterministicLedger>, PortError> {
    ledger
        .lock()
        .map_err(|e| PortError::Transport(format!("signing ledger lock poisoned: {e}")))
}

/// Accepts `BaseAccount` as well as wrapped (vesting, module) account shapes.
fn account_numbers_from_json(account: &Value) -> Option<(String, String)> {
    if let Some(number) = account.get("account_number") {
        let sequence = account
            .get("sequence")
            .map(json_number_string)
            .unwrap_or_else(|| "0".to_owned());
        return Some((json_number_string(number), sequence));
    }
    ["base_account", "base_vesting_account"]
        .iter()
        .find_map(|key| account.get(*key).and_then(account_numbers_from_json))
}

fn json_number_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// LCD and RPC JSON encode 64-bit integers as strings; accept both forms.
fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => other.as_u64(),
    }
}

fn broadcast_response_from_json(result: &Value) -> Result<BroadcastResponse, PortError> {
    let transaction_hash = result
        .get("txhash")
        .or_else(|| result.get("transactionHash"))
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| PortError::Transport("broadcast response missing txhash".to_owned()))?
        .to_owned();
    // An absent code means success; a present but unreadable one is never treated as 0.
    let code = match result.get("code") {
        None | Some(Value::Null) => 0,
        Some(raw) => json_u64(raw)
            .and_then(|c| u32::try_from(c).ok())
            .ok_or_else(|| {
                PortError::Transport(format!("broadcast response has invalid code: {raw}"))
            })?,
    };
    let height = result.get("height").and_then(json_u64);
    let raw_log = result
        .get("raw_log")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    Ok(BroadcastResponse {
        transaction_hash,
        code,
        height,
        raw_log,
    })
}
