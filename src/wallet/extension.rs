//! Wallet extension request surface.
//!
//! Mirrors the EIP-1193 methods the bridge needs: account authorization,
//! chain inspection, chain registration, transaction submission and the
//! read calls a wallet proxies to its active node.

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::network::NetworkConfig;

/// Errors returned by a wallet extension.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The user declined the prompt (EIP-1193 code 4001).
    #[error("User rejected the request")]
    UserRejected,

    /// The requested method needs an authorized account (code 4100).
    #[error("Account not authorized")]
    Unauthorized,

    /// Malformed request parameters (code -32602).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The node behind the wallet failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node behind the wallet did not answer in time.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),
}

impl WalletError {
    /// EIP-1193 / JSON-RPC error code.
    pub fn code(&self) -> i64 {
        match self {
            WalletError::UserRejected => 4001,
            WalletError::Unauthorized => 4100,
            WalletError::InvalidRequest(_) => -32602,
            WalletError::Rpc(_) | WalletError::Timeout(_) => -32603,
        }
    }
}

/// Result type for wallet requests.
pub type WalletResult<T> = Result<T, WalletError>;

/// Native currency descriptor sent with `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    /// ETH, 18 decimals. Both supported networks use it.
    pub fn ether() -> Self {
        Self {
            name: "Ethereum".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Parameters of a `wallet_addEthereumChain` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
}

impl AddChainParams {
    /// Build the request for a registry network.
    pub fn for_network(network: &NetworkConfig) -> Self {
        Self {
            chain_id: network.chain_id_hex.clone(),
            chain_name: network.display_name.clone(),
            rpc_urls: vec![network.rpc_url.to_string()],
            native_currency: NativeCurrency::ether(),
        }
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxConfirmation {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the transaction reverted.
    pub success: bool,
}

/// A wallet extension the user interacts with.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    /// `eth_requestAccounts`: prompt for authorization when needed.
    async fn request_accounts(&self) -> WalletResult<Vec<Address>>;

    /// `eth_accounts`: authorized accounts, never prompts.
    async fn accounts(&self) -> WalletResult<Vec<Address>>;

    /// `eth_chainId`: the wallet's active chain.
    async fn chain_id(&self) -> WalletResult<u64>;

    /// `wallet_addEthereumChain`: register the chain if unknown and make it active.
    async fn add_ethereum_chain(&self, params: &AddChainParams) -> WalletResult<()>;

    /// `eth_sendTransaction` on the active chain.
    async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash>;

    /// `eth_blockNumber` on the active chain.
    async fn block_number(&self) -> WalletResult<u64>;

    /// `eth_getTransactionReceipt` on `chain_id`, which need not be the active chain.
    async fn transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> WalletResult<Option<TxConfirmation>>;
}

/// A request the wallet needs the user to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletPrompt {
    ConnectAccount { address: Address },
    AddChain { chain_id: u64, chain_name: String, rpc_url: String },
    SwitchChain { chain_id: u64, chain_name: String },
    SendTransaction { chain_id: u64, from: Address, to: Option<Address> },
}

impl fmt::Display for WalletPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletPrompt::ConnectAccount { address } => {
                write!(f, "Connect account {} to this site", address)
            }
            WalletPrompt::AddChain { chain_id, chain_name, rpc_url } => write!(
                f,
                "Add network '{}' (chain {}) via {} and switch to it",
                chain_name, chain_id, rpc_url
            ),
            WalletPrompt::SwitchChain { chain_id, chain_name } => {
                write!(f, "Switch to network '{}' (chain {})", chain_name, chain_id)
            }
            WalletPrompt::SendTransaction { chain_id, from, to } => match to {
                Some(to) => write!(f, "Send transaction from {} to {} on chain {}", from, to, chain_id),
                None => write!(f, "Send contract creation from {} on chain {}", from, chain_id),
            },
        }
    }
}

/// Decides whether a wallet prompt is approved. May block on user input.
pub type Approver = Arc<dyn Fn(&WalletPrompt) -> bool + Send + Sync>;

/// Approver that accepts everything.
pub fn approve_all() -> Approver {
    Arc::new(|_| true)
}

/// Run an RPC future with a deadline, flattening its error into [`WalletError`].
pub(crate) async fn with_rpc_timeout<T, E, F>(limit: Duration, fut: F) -> WalletResult<T>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: fmt::Display,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(WalletError::Rpc(e.to_string())),
        Err(_) => Err(WalletError::Timeout(limit.as_secs())),
    }
}
