//! Error kinds surfaced by bridge actions.
//!
//! Every variant maps to a user-visible message; none of them is allowed to
//! escape an action boundary as a panic.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::wallet::WalletError;

/// Errors produced by the session and transfer core.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration rejected before any component was built.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network name not present in the registry. Indicates a config/selector mismatch.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// No wallet extension is available in this environment.
    #[error("Wallet extension not available")]
    WalletUnavailable,

    /// The user rejected the account authorization request.
    #[error("Account authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The wallet refused (or could not perform) the chain add/switch.
    #[error("Chain switch rejected: {0}")]
    ChainSwitchRejected(String),

    /// A transfer was requested before a signer was available.
    #[error("No signer available")]
    NoSigner,

    /// Submission or confirmation failed.
    #[error("Transfer failed: {cause}")]
    TransferFailed {
        #[source]
        cause: TransferFailure,
    },
}

/// Underlying cause of a failed transfer.
#[derive(Debug, Error)]
pub enum TransferFailure {
    /// Wallet refused or failed to submit, or the node failed while we waited.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The transaction was mined but reverted.
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    /// No receipt was observed within the configured wait.
    #[error("Transaction {tx_hash} not confirmed within {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },
}

impl From<TransferFailure> for BridgeError {
    fn from(cause: TransferFailure) -> Self {
        BridgeError::TransferFailed { cause }
    }
}

impl BridgeError {
    /// Message shown to the user at the action boundary.
    pub fn user_message(&self) -> String {
        match self {
            BridgeError::InvalidConfig(reason) => {
                format!("The bridge is misconfigured: {}", reason)
            }
            BridgeError::UnknownNetwork(name) => {
                format!("Network '{}' is not supported.", name)
            }
            BridgeError::WalletUnavailable => {
                "Wallet not detected! Please install or enable a wallet extension.".to_string()
            }
            BridgeError::AuthorizationDenied(_) => {
                "Wallet connection was rejected. Connect again to retry.".to_string()
            }
            BridgeError::ChainSwitchRejected(reason) => {
                format!("Could not switch the wallet to the source network ({}).", reason)
            }
            BridgeError::NoSigner => "Please connect to the wallet first.".to_string(),
            BridgeError::TransferFailed { cause } => {
                format!("Transfer failed: {}", cause)
            }
        }
    }

    /// Whether re-invoking the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::AuthorizationDenied(_)
                | BridgeError::ChainSwitchRejected(_)
                | BridgeError::TransferFailed { .. }
        )
    }

    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::InvalidConfig(_) => "invalid_config",
            BridgeError::UnknownNetwork(_) => "unknown_network",
            BridgeError::WalletUnavailable => "wallet_unavailable",
            BridgeError::AuthorizationDenied(_) => "authorization_denied",
            BridgeError::ChainSwitchRejected(_) => "chain_switch_rejected",
            BridgeError::NoSigner => "no_signer",
            BridgeError::TransferFailed { .. } => "transfer_failed",
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
