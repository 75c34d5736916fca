use std::sync::{Arc, Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use rusty_send_core::{
    AccountData, AminoSignResponse, OfflineSigner, PortError, PubKey, StdSignDoc, StdSignature,
    WalletProviderPort,
};

use crate::jsonrpc::JsonRpcBridge;
use crate::TransferAdapterConfig;

pub const DEV_ACCOUNT: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";
const SECP256K1_PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

#[derive(Debug, Clone)]
pub struct KeplrAdapter {
    mode: WalletMode,
    state: Arc<Mutex<WalletState>>,
}

#[derive(Debug, Clone)]
enum WalletMode {
    Disabled(String),
    Deterministic,
    Proxy(JsonRpcBridge),
}

#[derive(Debug, Clone)]
struct WalletState {
    accounts: Vec<AccountData>,
    enabled_chains: Vec<String>,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            accounts: vec![dev_account(DEV_ACCOUNT)],
            enabled_chains: Vec::new(),
        }
    }
}

impl Default for KeplrAdapter {
    fn default() -> Self {
        Self::with_config(TransferAdapterConfig::from_env())
    }
}

impl KeplrAdapter {
    pub fn with_config(config: TransferAdapterConfig) -> Self {
        let mode = if let Some(ref url) = config.wallet_bridge_url {
            match config.untimed_http_client() {
                Ok(client) => WalletMode::Proxy(JsonRpcBridge::new("keplr bridge", url.clone(), client)),
                Err(e) if config.strict_runtime_required() => WalletMode::Disabled(format!(
                    "failed to initialize Keplr bridge client in production profile: {e}"
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "Keplr bridge client unavailable; using deterministic wallet");
                    WalletMode::Deterministic
                }
            }
        } else if config.strict_runtime_required() {
            WalletMode::Disabled("Keplr wallet bridge not configured".to_owned())
        } else {
            WalletMode::Deterministic
        };

        match &mode {
            WalletMode::Disabled(reason) => tracing::warn!(%reason, "Keplr wallet disabled"),
            WalletMode::Deterministic => tracing::info!("using deterministic development wallet"),
            WalletMode::Proxy(_) => tracing::info!("using Keplr JSON-RPC bridge"),
        }

        Self {
            mode,
            state: Arc::new(Mutex::new(WalletState::default())),
        }
    }

    /// Replaces the accounts exposed by the deterministic wallet.
    pub fn debug_set_accounts(&self, addresses: &[&str]) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.accounts = addresses.iter().map(|a| dev_account(a)).collect();
        Ok(())
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let WalletMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, WalletState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("wallet lock poisoned: {e}")))
    }

    fn accounts(&self, chain_id: &str) -> Result<Vec<AccountData>, PortError> {
        self.check_mode()?;

        if let WalletMode::Proxy(bridge) = &self.mode {
            let result = bridge.call("keplr_getAccounts", serde_json::json!([chain_id]))?;
            let accounts: Vec<AccountData> = serde_json::from_value(result)
                .map_err(|e| PortError::Transport(format!("keplr_getAccounts: invalid accounts: {e}")))?;
            let mut g = self.lock_state()?;
            g.accounts = accounts.clone();
            return Ok(accounts);
        }

        let g = self.lock_state()?;
        if !g.enabled_chains.iter().any(|c| c == chain_id) {
            return Err(PortError::Policy(format!("chain {chain_id} is not enabled")));
        }
        Ok(g.accounts.clone())
    }

    fn sign(
        &self,
        chain_id: &str,
        signer_address: &str,
        sign_doc: &StdSignDoc,
    ) -> Result<AminoSignResponse, PortError> {
        self.check_mode()?;

        if let WalletMode::Proxy(bridge) = &self.mode {
            let doc = serde_json::to_value(sign_doc)
                .map_err(|e| PortError::Validation(format!("sign doc serialization failed: {e}")))?;
            let result = bridge.call(
                "keplr_signAmino",
                serde_json::json!([chain_id, signer_address, doc]),
            )?;
            return serde_json::from_value(result)
                .map_err(|e| PortError::Transport(format!("keplr_signAmino: invalid response: {e}")));
        }

        if sign_doc.chain_id != chain_id {
            return Err(PortError::Validation(format!(
                "sign doc chain {} does not match signer chain {chain_id}",
                sign_doc.chain_id
            )));
        }
        let account = self
            .accounts(chain_id)?
            .into_iter()
            .find(|a| a.address == signer_address)
            .ok_or_else(|| PortError::NotFound(format!("unknown signer: {signer_address}")))?;
        let bytes = sign_doc.sign_bytes()?;
        Ok(AminoSignResponse {
            signed: sign_doc.clone(),
            signature: StdSignature {
                pub_key: PubKey {
                    r#type: SECP256K1_PUBKEY_TYPE.to_owned(),
                    value: account.pubkey,
                },
                signature: deterministic_signature(signer_address, &bytes),
            },
        })
    }
}

impl WalletProviderPort for KeplrAdapter {
    type Signer = KeplrOfflineSigner;

    fn is_installed(&self) -> bool {
        !matches!(self.mode, WalletMode::Disabled(_))
    }

    fn enable(&self, chain_id: &str) -> Result<(), PortError> {
        self.check_mode()?;

        if let WalletMode::Proxy(bridge) = &self.mode {
            bridge.call("keplr_enable", serde_json::json!([chain_id]))?;
        }

        let mut g = self.lock_state()?;
        if !g.enabled_chains.iter().any(|c| c == chain_id) {
            g.enabled_chains.push(chain_id.to_owned());
        }
        Ok(())
    }

    fn offline_signer(&self, chain_id: &str) -> Result<Self::Signer, PortError> {
        self.check_mode()?;
        Ok(KeplrOfflineSigner {
            wallet: self.clone(),
            chain_id: chain_id.to_owned(),
        })
    }
}

/// Offline signer bound to one chain; shares state with the adapter that created it.
#[derive(Debug, Clone)]
pub struct KeplrOfflineSigner {
    wallet: KeplrAdapter,
    chain_id: String,
}

impl KeplrOfflineSigner {
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

impl OfflineSigner for KeplrOfflineSigner {
    fn get_accounts(&self) -> Result<Vec<AccountData>, PortError> {
        self.wallet.accounts(&self.chain_id)
    }

    fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: &StdSignDoc,
    ) -> Result<AminoSignResponse, PortError> {
        self.wallet.sign(&self.chain_id, signer_address, sign_doc)
    }
}

fn dev_account(address: &str) -> AccountData {
    let digest = Sha256::digest(address.as_bytes());
    let mut pubkey = Vec::with_capacity(33);
    pubkey.push(0x02);
    pubkey.extend_from_slice(&digest);
    AccountData {
        address: address.to_owned(),
        algo: "secp256k1".to_owned(),
        pubkey: BASE64.encode(pubkey),
    }
}

fn deterministic_signature(signer_address: &str, sign_bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signer_address.as_bytes());
    hasher.update(sign_bytes);
    let r = hasher.finalize();
    let s = Sha256::digest(r);
    let mut sig = Vec::with_capacity(64);
    sig.extend_from_slice(&r);
    sig.extend_from_slice(&s);
    BASE64.encode(sig)
}
