pub mod balance;
pub mod config;
mod jsonrpc;
pub mod keplr;
pub mod signing_client;

pub use balance::RestBalanceAdapter;
pub use config::{RuntimeProfile, TransferAdapterConfig};
pub use keplr::{KeplrAdapter, KeplrOfflineSigner};
pub use signing_client::SigningClientAdapter;
