#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusty_send_core::{
    AccountData, AminoSignResponse, BalancePort, BroadcastResponse, ChainConfig, Coin, MsgSend,
    OfflineSigner, PortError, PubKey, SigningClientPort, StdFee, StdSignDoc, StdSignature,
    TransferFlowController, TransferRequest, WalletProviderPort,
};

pub const SENDER: &str = "cosmos1sender0000000000000000000000000000000";
pub const RECIPIENT: &str = "cosmos1recipient000000000000000000000000000";

#[derive(Debug, Default)]
pub struct CallLog {
    pub calls: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().expect("call log lock").push(call.into());
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .expect("call log lock")
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().expect("call log lock").len()
    }
}

#[derive(Debug, Clone)]
pub struct FakeWallet {
    pub installed: bool,
    pub accounts: Vec<AccountData>,
    pub enable_error: Option<String>,
    pub sign_error: Option<String>,
    pub log: Arc<CallLog>,
}

impl FakeWallet {
    pub fn with_account(log: Arc<CallLog>) -> Self {
        Self {
            installed: true,
            accounts: vec![account(SENDER)],
            enable_error: None,
            sign_error: None,
            log,
        }
    }

    pub fn missing(log: Arc<CallLog>) -> Self {
        Self {
            installed: false,
            accounts: Vec::new(),
            enable_error: None,
            sign_error: None,
            log,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeSigner {
    accounts: Vec<AccountData>,
    sign_error: Option<String>,
    log: Arc<CallLog>,
}

impl WalletProviderPort for FakeWallet {
    type Signer = FakeSigner;

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn enable(&self, chain_id: &str) -> Result<(), PortError> {
        self.log.push(format!("wallet.enable:{chain_id}"));
        match &self.enable_error {
            Some(msg) => Err(PortError::Policy(msg.clone())),
            None => Ok(()),
        }
    }

    fn offline_signer(&self, chain_id: &str) -> Result<Self::Signer, PortError> {
        self.log.push(format!("wallet.offline_signer:{chain_id}"));
        Ok(FakeSigner {
            accounts: self.accounts.clone(),
            sign_error: self.sign_error.clone(),
            log: Arc::clone(&self.log),
        })
    }
}

impl OfflineSigner for FakeSigner {
    fn get_accounts(&self) -> Result<Vec<AccountData>, PortError> {
        self.log.push("signer.get_accounts");
        Ok(self.accounts.clone())
    }

    fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: &StdSignDoc,
    ) -> Result<AminoSignResponse, PortError> {
        self.log.push(format!("signer.sign_amino:{signer_address}"));
        if let Some(msg) = &self.sign_error {
            return Err(PortError::Policy(msg.clone()));
        }
        Ok(AminoSignResponse {
            signed: sign_doc.clone(),
            signature: StdSignature {
                pub_key: PubKey {
                    r#type: "tendermint/PubKeySecp256k1".to_owned(),
                    value: "AAAA".to_owned(),
                },
                signature: "c2lnbmF0dXJl".to_owned(),
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct FakeBalances {
    pub coins: HashMap<String, Vec<Coin>>,
    pub error: Option<String>,
    pub log: Arc<CallLog>,
}

impl FakeBalances {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            coins: HashMap::new(),
            error: None,
            log,
        }
    }

    pub fn with(mut self, address: &str, coins: Vec<Coin>) -> Self {
        self.coins.insert(address.to_owned(), coins);
        self
    }
}

impl BalancePort for FakeBalances {
    fn all_balances(&self, address: &str) -> Result<Vec<Coin>, PortError> {
        self.log.push(format!("balances:{address}"));
        if let Some(msg) = &self.error {
            return Err(PortError::Transport(msg.clone()));
        }
        Ok(self.coins.get(address).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct Broadcast {
    pub signer_address: String,
    pub messages: Vec<MsgSend>,
    pub fee: StdFee,
    pub memo: String,
}

#[derive(Debug, Clone)]
pub struct FakeSigningClient {
    pub tx_hash: String,
    pub reject_code: Option<u32>,
    pub broadcasts: Arc<Mutex<Vec<Broadcast>>>,
    pub log: Arc<CallLog>,
}

impl FakeSigningClient {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            tx_hash: "ABCDEF0123456789".to_owned(),
            reject_code: None,
            broadcasts: Arc::new(Mutex::new(Vec::new())),
            log,
        }
    }

    pub fn broadcasts(&self) -> Vec<Broadcast> {
        self.broadcasts.lock().expect("broadcast lock").clone()
    }
}

impl SigningClientPort for FakeSigningClient {
    fn sign_and_broadcast<S: OfflineSigner>(
        &self,
        signer: &S,
        signer_address: &str,
        messages: &[MsgSend],
        fee: &StdFee,
        memo: &str,
    ) -> Result<BroadcastResponse, PortError> {
        self.log.push("signing.sign_and_broadcast");
        let msgs = messages
            .iter()
            .map(|m| m.to_amino())
            .collect::<Result<Vec<_>, _>>()?;
        let doc = StdSignDoc {
            account_number: "7".to_owned(),
            chain_id: "cosmoshub-4".to_owned(),
            fee: fee.clone(),
            memo: memo.to_owned(),
            msgs,
            sequence: "0".to_owned(),
        };
        signer.sign_amino(signer_address, &doc)?;
        if let Some(code) = self.reject_code {
            return Err(PortError::Rejected(format!("code {code}: insufficient funds")));
        }
        self.broadcasts
            .lock()
            .expect("broadcast lock")
            .push(Broadcast {
                signer_address: signer_address.to_owned(),
                messages: messages.to_vec(),
                fee: fee.clone(),
                memo: memo.to_owned(),
            });
        Ok(BroadcastResponse {
            transaction_hash: self.tx_hash.clone(),
            code: 0,
            height: Some(1),
            raw_log: String::new(),
        })
    }
}

pub type TestController = TransferFlowController<FakeWallet, FakeBalances, FakeSigningClient>;

pub fn account(address: &str) -> AccountData {
    AccountData {
        address: address.to_owned(),
        algo: "secp256k1".to_owned(),
        pubkey: "AAAA".to_owned(),
    }
}

pub fn uatom(amount: &str) -> Coin {
    Coin::new(amount, "uatom")
}

pub fn new_controller(wallet: FakeWallet, balances: FakeBalances, log: Arc<CallLog>) -> TestController {
    TransferFlowController::new(
        wallet,
        balances,
        FakeSigningClient::new(log),
        ChainConfig::default(),
    )
}

pub fn connected_controller(log: Arc<CallLog>) -> TestController {
    let balances = FakeBalances::new(Arc::clone(&log)).with(SENDER, vec![uatom("2500000")]);
    let mut controller = new_controller(FakeWallet::with_account(Arc::clone(&log)), balances, log);
    controller.detect_and_connect().expect("connect");
    controller
}

pub fn request(recipient: &str, amount: &str, memo: &str) -> TransferRequest {
    TransferRequest {
        recipient: recipient.to_owned(),
        amount: amount.to_owned(),
        memo: memo.to_owned(),
    }
}
