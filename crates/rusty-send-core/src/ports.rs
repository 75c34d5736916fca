use thiserror::Error;

use crate::domain::{AccountData, AminoSignResponse, BroadcastResponse, Coin, MsgSend, StdFee, StdSignDoc};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("broadcast rejected: {0}")]
    Rejected(String),
}

/// Wallet capability that signs without exposing key material.
pub trait OfflineSigner {
    fn get_accounts(&self) -> Result<Vec<AccountData>, PortError>;
    fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: &StdSignDoc,
    ) -> Result<AminoSignResponse, PortError>;
}

/// Injected wallet extension (Keplr or compatible).
pub trait WalletProviderPort {
    type Signer: OfflineSigner;

    fn is_installed(&self) -> bool;
    fn enable(&self, chain_id: &str) -> Result<(), PortError>;
    fn offline_signer(&self, chain_id: &str) -> Result<Self::Signer, PortError>;
}

pub trait BalancePort {
    fn all_balances(&self, address: &str) -> Result<Vec<Coin>, PortError>;
}

/// Signs a set of messages with the given signer and broadcasts the result.
///
/// Implementations return `PortError::Rejected` when the chain answers with a
/// non-zero result code.
pub trait SigningClientPort {
    fn sign_and_broadcast<S: OfflineSigner>(
        &self,
        signer: &S,
        signer_address: &str,
        messages: &[MsgSend],
        fee: &StdFee,
        memo: &str,
    ) -> Result<BroadcastResponse, PortError>;
}
