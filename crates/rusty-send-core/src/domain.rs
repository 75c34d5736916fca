use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::format_base_units;
use crate::ports::PortError;

pub const MSG_SEND_AMINO_TYPE: &str = "cosmos-sdk/MsgSend";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub amount: String,
    pub denom: String,
}

impl Coin {
    pub fn new(amount: impl Into<String>, denom: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            denom: denom.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub amount: Vec<Coin>,
    pub from_address: String,
    pub to_address: String,
}

impl MsgSend {
    pub fn to_amino(&self) -> Result<AminoMsg, PortError> {
        let value = serde_json::to_value(self)
            .map_err(|e| PortError::Validation(format!("MsgSend serialization failed: {e}")))?;
        Ok(AminoMsg {
            r#type: MSG_SEND_AMINO_TYPE.to_owned(),
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoMsg {
    pub r#type: String,
    pub value: Value,
}

/// Legacy amino JSON sign document.
///
/// Fields are declared in sorted order; [`StdSignDoc::sign_bytes`] additionally goes
/// through `serde_json::Value` so nested objects are emitted with sorted keys too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: StdFee,
    pub memo: String,
    pub msgs: Vec<AminoMsg>,
    pub sequence: String,
}

impl StdSignDoc {
    pub fn sign_bytes(&self) -> Result<Vec<u8>, PortError> {
        let canonical = serde_json::to_value(self)
            .map_err(|e| PortError::Validation(format!("sign doc serialization failed: {e}")))?;
        serde_json::to_vec(&canonical)
            .map_err(|e| PortError::Validation(format!("sign doc encoding failed: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    pub r#type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoSignResponse {
    pub signed: StdSignDoc,
    pub signature: StdSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    pub fee: StdFee,
    pub memo: String,
    pub msg: Vec<AminoMsg>,
    pub signatures: Vec<StdSignature>,
}

impl StdTx {
    pub fn from_signed(response: AminoSignResponse) -> Self {
        Self {
            fee: response.signed.fee,
            memo: response.signed.memo,
            msg: response.signed.msgs,
            signatures: vec![response.signature],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub address: String,
    pub algo: String,
    /// Base64 encoded compressed public key.
    pub pubkey: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastResponse {
    pub transaction_hash: String,
    pub code: u32,
    pub height: Option<u64>,
    pub raw_log: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub address: Option<String>,
}

impl Session {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            connected: true,
            address: Some(address.into()),
        }
    }
}

/// Spendable balance of the chain's fee denom, rendered in display units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    amount: String,
}

impl Balance {
    pub fn zero() -> Self {
        Self {
            amount: "0".to_owned(),
        }
    }

    pub fn from_base_units(units: u128, decimals: u32) -> Self {
        Self {
            amount: format_base_units(units, decimals),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.chars().all(|c| c == '0' || c == '.')
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.amount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
    pub memo: String,
}

impl TransferRequest {
    pub fn is_empty(&self) -> bool {
        self.recipient.is_empty() && self.amount.is_empty() && self.memo.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub transaction_hash: String,
    pub explorer_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: String,
    pub bech32_prefix: String,
    pub denom: String,
    pub display_denom: String,
    pub decimals: u32,
    pub rpc_endpoint: String,
    pub rest_endpoint: String,
    pub fee_amount: String,
    pub gas_limit: String,
    pub default_memo: String,
    pub explorer_tx_base: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: "cosmoshub-4".to_owned(),
            bech32_prefix: "cosmos".to_owned(),
            denom: "uatom".to_owned(),
            display_denom: "ATOM".to_owned(),
            decimals: 6,
            rpc_endpoint: "https://cosmos-rpc.polkachu.com".to_owned(),
            rest_endpoint: "https://cosmos-rest.publicnode.com".to_owned(),
            fee_amount: "5000".to_owned(),
            gas_limit: "200000".to_owned(),
            default_memo: "Transfer ATOM via rusty-send".to_owned(),
            explorer_tx_base: "https://www.mintscan.io/cosmos/txs".to_owned(),
        }
    }
}

impl ChainConfig {
    pub fn fee(&self) -> StdFee {
        StdFee {
            amount: vec![Coin::new(self.fee_amount.clone(), self.denom.clone())],
            gas: self.gas_limit.clone(),
        }
    }

    pub fn explorer_url(&self, transaction_hash: &str) -> String {
        format!(
            "{}/{}",
            self.explorer_tx_base.trim_end_matches('/'),
            transaction_hash
        )
    }

    pub fn memo_or_default<'a>(&'a self, memo: &'a str) -> &'a str {
        if memo.trim().is_empty() {
            &self.default_memo
        } else {
            memo
        }
    }

    pub fn address_prefix(&self) -> String {
        format!("{}1", self.bech32_prefix)
    }
}
