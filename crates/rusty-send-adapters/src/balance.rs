use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use rusty_send_core::{BalancePort, Coin, PortError};

use crate::TransferAdapterConfig;

#[derive(Debug, Clone)]
pub struct RestBalanceAdapter {
    mode: BalanceMode,
}

#[derive(Debug, Clone)]
enum BalanceMode {
    Disabled(String),
    InMemory(Arc<Mutex<HashMap<String, Vec<Coin>>>>),
    Http(HttpRuntime),
}

#[derive(Debug, Clone)]
struct HttpRuntime {
    rest_endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Option<Vec<Coin>>,
}

impl Default for RestBalanceAdapter {
    fn default() -> Self {
        Self::with_config(TransferAdapterConfig::from_env())
    }
}

impl RestBalanceAdapter {
    pub fn with_config(config: TransferAdapterConfig) -> Self {
        let mode = if !config.balance_http_enabled {
            if config.strict_runtime_required() {
                BalanceMode::Disabled("balance REST runtime disabled in production profile".to_owned())
            } else {
                BalanceMode::InMemory(Arc::default())
            }
        } else {
            match config.http_client() {
                Ok(client) => BalanceMode::Http(HttpRuntime {
                    rest_endpoint: config.chain.rest_endpoint.trim_end_matches('/').to_owned(),
                    client,
                }),
                Err(e) => BalanceMode::Disabled(format!("failed to initialize REST client: {e}")),
            }
        };
        Self { mode }
    }

    pub fn in_memory() -> Self {
        Self {
            mode: BalanceMode::InMemory(Arc::default()),
        }
    }

    pub fn set_balances(&self, address: &str, coins: Vec<Coin>) -> Result<(), PortError> {
        let BalanceMode::InMemory(store) = &self.mode else {
            return Err(PortError::NotImplemented(
                "balances can only be seeded on the in-memory adapter",
            ));
        };
        let mut g = store
            .lock()
            .map_err(|e| PortError::Transport(format!("balance lock poisoned: {e}")))?;
        g.insert(address.to_owned(), coins);
        Ok(())
    }
}

impl BalancePort for RestBalanceAdapter {
    fn all_balances(&self, address: &str) -> Result<Vec<Coin>, PortError> {
        match &self.mode {
            BalanceMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            BalanceMode::InMemory(store) => {
                let g = store
                    .lock()
                    .map_err(|e| PortError::Transport(format!("balance lock poisoned: {e}")))?;
                Ok(g.get(address).cloned().unwrap_or_default())
            }
            BalanceMode::Http(runtime) => {
                let url = format!(
                    "{}/cosmos/bank/v1beta1/balances/{address}",
                    runtime.rest_endpoint
                );
                let response = runtime
                    .client
                    .get(&url)
                    .send()
                    .map_err(|e| PortError::Transport(format!("balance request failed: {e}")))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(PortError::Transport(format!(
                        "balance request returned status {status}"
                    )));
                }
                let body: BalancesResponse = response
                    .json()
                    .map_err(|e| PortError::Transport(format!("balance json decode failed: {e}")))?;
                Ok(body.balances.unwrap_or_default())
            }
        }
    }
}
