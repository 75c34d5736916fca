use thiserror::Error;

use crate::amount::{parse_amount, AmountError};
use crate::domain::{
    Balance, ChainConfig, Coin, MsgSend, Session, TransferRequest, TransferResult,
};
use crate::ports::{BalancePort, OfflineSigner, PortError, SigningClientPort, WalletProviderPort};
use crate::state_machine::{flow_transition, FlowAction, FlowStatus, StateTransition, TransitionError};

/// Failure of a controller operation. The `Display` text is what the page shows.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Please install the Keplr wallet extension first!")]
    ProviderMissing,
    #[error("Please connect Keplr wallet first")]
    NotConnected,
    #[error("Please enter recipient address and amount")]
    MissingFields,
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("Recipient must be a {prefix}... address")]
    InvalidRecipient { prefix: String },
    #[error("Connection failed: {0}")]
    Connection(PortError),
    #[error("Transfer failed: {0}")]
    Transfer(PortError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Clone, Default)]
pub struct TransferState {
    pub status: FlowStatus,
    pub session: Session,
    pub balance: Balance,
    pub form: TransferRequest,
    pub result: Option<TransferResult>,
    pub error: Option<String>,
    pub last_transition: Option<StateTransition>,
}

/// Sequences wallet connection, balance lookup and sign-and-broadcast for one page.
///
/// Every operation takes `&mut self`, so callers that share a controller across
/// threads serialize operations behind their own lock.
pub struct TransferFlowController<W, B, S>
where
    W: WalletProviderPort,
    B: BalancePort,
    S: SigningClientPort,
{
    pub wallet: W,
    pub balances: B,
    pub signing: S,
    chain: ChainConfig,
    state: TransferState,
}

impl<W, B, S> TransferFlowController<W, B, S>
where
    W: WalletProviderPort,
    B: BalancePort,
    S: SigningClientPort,
{
    pub fn new(wallet: W, balances: B, signing: S, chain: ChainConfig) -> Self {
        Self {
            wallet,
            balances,
            signing,
            chain,
            state: TransferState::default(),
        }
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    pub fn status(&self) -> FlowStatus {
        self.state.status
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn form(&self) -> &TransferRequest {
        &self.state.form
    }

    pub fn update_form(&mut self, request: TransferRequest) {
        self.state.form = request;
    }

    /// Start-up probe. Never surfaces an error; returns whether a session was restored.
    pub fn auto_connect(&mut self) -> bool {
        if self.state.status != FlowStatus::Disconnected || !self.wallet.is_installed() {
            return false;
        }
        match self.connect_first_account() {
            Ok(address) => {
                if let Err(e) = self.transition(FlowAction::Restore) {
                    tracing::warn!(error = %e, "auto-connect raced another operation");
                    return false;
                }
                self.state.session = Session::connected(address.clone());
                self.fetch_balance(&address);
                tracing::info!(%address, "wallet session restored");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to connect to wallet on start-up");
                false
            }
        }
    }

    pub fn detect_and_connect(&mut self) -> Result<Session, FlowError> {
        if !self.wallet.is_installed() {
            return Err(self.reject(FlowError::ProviderMissing));
        }
        self.transition(FlowAction::Begin)?;

        match self.connect_first_account() {
            Ok(address) => {
                self.state.session = Session::connected(address.clone());
                self.fetch_balance(&address);
                self.state.error = None;
                self.transition(FlowAction::ConnectSucceeded)?;
                tracing::info!(%address, chain_id = %self.chain.chain_id, "wallet connected");
                Ok(self.state.session.clone())
            }
            Err(e) => Err(self.fail(FlowError::Connection(e))),
        }
    }

    /// Looks up the spendable balance of the chain denom. Failures downgrade to zero.
    pub fn fetch_balance(&mut self, address: &str) -> &Balance {
        let balance = match self.balances.all_balances(address) {
            Ok(coins) => match coins.iter().find(|c| c.denom == self.chain.denom) {
                Some(coin) => match coin.amount.trim().parse::<u128>() {
                    Ok(units) => Balance::from_base_units(units, self.chain.decimals),
                    Err(e) => {
                        tracing::warn!(%address, amount = %coin.amount, error = %e, "unparsable balance amount");
                        Balance::zero()
                    }
                },
                None => Balance::zero(),
            },
            Err(e) => {
                tracing::warn!(%address, error = %e, "failed to fetch balance");
                Balance::zero()
            }
        };
        self.state.balance = balance;
        &self.state.balance
    }

    pub fn refresh_balance(&mut self) -> Option<&Balance> {
        let address = self.state.session.address.clone()?;
        Some(self.fetch_balance(&address))
    }

    pub fn submit_transfer(&mut self) -> Result<TransferResult, FlowError> {
        if !self.wallet.is_installed() || !self.state.session.connected {
            return Err(self.reject(FlowError::NotConnected));
        }
        let request = self.state.form.clone();
        let units = match self.validate(&request) {
            Ok(units) => units,
            Err(e) => return Err(self.reject(e)),
        };

        self.transition(FlowAction::Begin)?;
        self.state.error = None;
        self.state.result = None;

        match self.sign_and_broadcast(&request, units) {
            Ok((sender, transaction_hash)) => {
                let result = TransferResult {
                    explorer_url: self.chain.explorer_url(&transaction_hash),
                    transaction_hash,
                };
                self.state.result = Some(result.clone());
                self.fetch_balance(&sender);
                self.state.form = TransferRequest::default();
                self.transition(FlowAction::SubmitSucceeded)?;
                tracing::info!(tx_hash = %result.transaction_hash, "transfer broadcast");
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "transfer failed");
                Err(self.fail(FlowError::Transfer(e)))
            }
        }
    }

    fn validate(&self, request: &TransferRequest) -> Result<u128, FlowError> {
        let recipient = request.recipient.trim();
        if recipient.is_empty() || request.amount.trim().is_empty() {
            return Err(FlowError::MissingFields);
        }
        let units = parse_amount(&request.amount, self.chain.decimals)?;
        let prefix = self.chain.address_prefix();
        if !recipient.starts_with(&prefix) || recipient.len() <= prefix.len() {
            return Err(FlowError::InvalidRecipient { prefix });
        }
        Ok(units)
    }

    fn connect_first_account(&self) -> Result<String, PortError> {
        self.wallet.enable(&self.chain.chain_id)?;
        let signer = self.wallet.offline_signer(&self.chain.chain_id)?;
        first_account(&signer)
    }

    fn sign_and_broadcast(
        &self,
        request: &TransferRequest,
        units: u128,
    ) -> Result<(String, String), PortError> {
        let signer = self.wallet.offline_signer(&self.chain.chain_id)?;
        let sender = first_account(&signer)?;
        let message = MsgSend {
            amount: vec![Coin::new(units.to_string(), self.chain.denom.clone())],
            from_address: sender.clone(),
            to_address: request.recipient.trim().to_owned(),
        };
        let fee = self.chain.fee();
        let memo = self.chain.memo_or_default(&request.memo);
        let response = self
            .signing
            .sign_and_broadcast(&signer, &sender, &[message], &fee, memo)?;
        Ok((sender, response.transaction_hash))
    }

    fn transition(&mut self, action: FlowAction) -> Result<(), TransitionError> {
        let (next, transition) = flow_transition(self.state.status, action)?;
        tracing::debug!(from = ?transition.from, to = ?transition.to, ?action, "flow transition");
        self.state.status = next;
        self.state.last_transition = Some(transition);
        Ok(())
    }

    fn reject(&mut self, error: FlowError) -> FlowError {
        if let Err(e) = self.transition(FlowAction::Reject) {
            return FlowError::Transition(e);
        }
        self.state.error = Some(error.to_string());
        error
    }

    fn fail(&mut self, error: FlowError) -> FlowError {
        if let Err(e) = self.transition(FlowAction::Fail) {
            return FlowError::Transition(e);
        }
        self.state.error = Some(error.to_string());
        error
    }
}

fn first_account<S: OfflineSigner>(signer: &S) -> Result<String, PortError> {
    signer
        .get_accounts()?
        .into_iter()
        .next()
        .map(|a| a.address)
        .ok_or_else(|| PortError::NotFound("wallet returned no accounts".to_owned()))
}
