//! Transfer attempt state and results.

use alloy::primitives::{Address, TxHash, U256};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::config::TransferConfig;
use crate::config::validation::ValidationError;
use crate::network::NetworkName;
use crate::transfer::amount::to_smallest_units;

/// Stage of a single transfer attempt.
///
/// ```text
/// Idle → SwitchingNetwork → Submitting → Confirming → Succeeded
///   └──────────┴───────────────┴────────────┴──────→ Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferState {
    Idle,
    SwitchingNetwork,
    Submitting,
    Confirming { tx_hash: TxHash },
    Succeeded { tx_hash: TxHash },
    Failed { reason: String },
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Succeeded { .. } | TransferState::Failed { .. })
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: &TransferState) -> bool {
        use TransferState::*;
        match (self, next) {
            (_, Failed { .. }) => !self.is_terminal(),
            (Idle, SwitchingNetwork) => true,
            (SwitchingNetwork, Submitting) => true,
            (Submitting, Confirming { .. }) => true,
            (Confirming { tx_hash: a }, Succeeded { tx_hash: b }) => a == b,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransferState::Idle => "idle",
            TransferState::SwitchingNetwork => "switching_network",
            TransferState::Submitting => "submitting",
            TransferState::Confirming { .. } => "confirming",
            TransferState::Succeeded { .. } => "succeeded",
            TransferState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Confirming { tx_hash } => write!(f, "confirming {}", tx_hash),
            TransferState::Succeeded { tx_hash } => write!(f, "succeeded {}", tx_hash),
            TransferState::Failed { reason } => write!(f, "failed: {}", reason),
            other => f.write_str(other.label()),
        }
    }
}

/// One run of the transfer state machine.
#[derive(Debug)]
pub struct TransferAttempt {
    id: Uuid,
    network: NetworkName,
    state: TransferState,
}

impl TransferAttempt {
    pub fn new(network: NetworkName) -> Self {
        Self {
            id: Uuid::new_v4(),
            network,
            state: TransferState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn network(&self) -> NetworkName {
        self.network
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    /// Move to `next`. Illegal transitions are ignored and logged.
    pub fn advance(&mut self, next: TransferState) -> bool {
        if !self.state.can_transition_to(&next) {
            tracing::error!(
                attempt = %self.id,
                from = %self.state,
                to = %next,
                "Illegal transfer state transition"
            );
            return false;
        }
        tracing::debug!(attempt = %self.id, from = %self.state, to = %next, "Transfer state");
        self.state = next;
        true
    }
}

/// Confirmed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub network: NetworkName,
    pub amount: U256,
}

/// Fixed transfer parameters, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSettings {
    pub recipient: Address,
    /// Amount in smallest token units.
    pub amount: U256,
    /// Amount as configured, for display.
    pub amount_display: String,
    pub token_symbol: String,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

impl TransferSettings {
    ///
    /// Rejects the same values `validate_config` reports for the
    /// `transfer` section.
    pub fn from_config(config: &TransferConfig) -> Result<Self, ValidationError> {
        let recipient: Address = config.recipient.parse().map_err(|_| {
            ValidationError::new(
                "transfer.recipient",
                format!("'{}' is not an address", config.recipient),
            )
        })?;
        let amount = to_smallest_units(&config.amount, config.token_decimals)
            .map_err(|e| ValidationError::new("transfer.amount", e.to_string()))?;
        if config.confirmation_timeout_secs == 0 {
            return Err(ValidationError::new(
                "transfer.confirmation_timeout_secs",
                "must be greater than zero",
            ));
        }
        if config.receipt_poll_interval_ms == 0 {
            return Err(ValidationError::new(
                "transfer.receipt_poll_interval_ms",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            recipient,
            amount,
            amount_display: config.amount.clone(),
            token_symbol: config.token_symbol.clone(),
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
        })
    }
}
