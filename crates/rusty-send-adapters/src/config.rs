use rusty_send_core::ChainConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    /// Missing bridges fall back to deterministic in-process adapters.
    #[default]
    Development,
    /// Missing bridges disable the adapter instead of faking it.
    Production,
}

impl RuntimeProfile {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub chain: ChainConfig,
    /// JSON-RPC endpoint that forwards `keplr_*` calls to the wallet extension.
    pub wallet_bridge_url: Option<String>,
    /// JSON-RPC endpoint that encodes signed amino txs and broadcasts them.
    pub signing_bridge_url: Option<String>,
    pub balance_http_enabled: bool,
    pub http_timeout_ms: u64,
}

impl Default for TransferAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            chain: ChainConfig::default(),
            wallet_bridge_url: None,
            signing_bridge_url: None,
            balance_http_enabled: true,
            http_timeout_ms: 15_000,
        }
    }
}

impl TransferAdapterConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(profile) = env_var("RUSTY_SEND_PROFILE") {
            match RuntimeProfile::parse(&profile) {
                Some(p) => cfg.runtime_profile = p,
                None => tracing::warn!(%profile, "unknown RUSTY_SEND_PROFILE; keeping development"),
            }
        }
        if let Some(chain_id) = env_var("RUSTY_SEND_CHAIN_ID") {
            cfg.chain.chain_id = chain_id;
        }
        if let Some(url) = env_var("RUSTY_SEND_RPC_ENDPOINT") {
            cfg.chain.rpc_endpoint = url;
        }
        if let Some(url) = env_var("RUSTY_SEND_REST_ENDPOINT") {
            cfg.chain.rest_endpoint = url;
        }
        cfg.wallet_bridge_url = env_var("RUSTY_SEND_WALLET_BRIDGE_URL");
        cfg.signing_bridge_url = env_var("RUSTY_SEND_SIGNING_BRIDGE_URL");
        if let Some(raw) = env_var("RUSTY_SEND_HTTP_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => cfg.http_timeout_ms = ms,
                Err(e) => tracing::warn!(%raw, error = %e, "invalid RUSTY_SEND_HTTP_TIMEOUT_MS"),
            }
        }
        cfg
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::blocking::Client, reqwest::Error> {
        reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(self.http_timeout_ms))
            .build()
    }

    /// Client for calls that wait on the user (wallet approval prompts).
    pub(crate) fn untimed_http_client(&self) -> Result<reqwest::blocking::Client, reqwest::Error> {
        reqwest::blocking::Client::builder().timeout(None).build()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
