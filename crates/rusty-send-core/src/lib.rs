pub mod amount;
pub mod controller;
pub mod domain;
pub mod ports;
pub mod state_machine;

pub use amount::{format_base_units, parse_amount, AmountError};
pub use controller::{FlowError, TransferFlowController, TransferState};
pub use domain::{
    AccountData, AminoMsg, AminoSignResponse, Balance, BroadcastResponse, ChainConfig, Coin,
    MsgSend, PubKey, Session, StdFee, StdSignDoc, StdSignature, StdTx, TransferRequest,
    TransferResult,
};
pub use ports::{BalancePort, OfflineSigner, PortError, SigningClientPort, WalletProviderPort};
pub use state_machine::{flow_transition, FlowAction, FlowStatus, StateTransition, TransitionError};
