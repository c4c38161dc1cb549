//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every supported network has a table entry
//! - Validate chain IDs, addresses, URLs and the transfer amount
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use std::fmt;
use url::Url;

use crate::config::schema::BridgeConfig;
use crate::network::types::parse_chain_id_hex;
use crate::network::NetworkName;
use crate::transfer::amount::to_smallest_units;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for name in NetworkName::ALL {
        let Some(entry) = config.networks.get(&name) else {
            errors.push(ValidationError::new(
                format!("networks.{}", name),
                "missing network definition",
            ));
            continue;
        };

        let prefix = format!("networks.{}", name);
        if parse_chain_id_hex(&entry.chain_id).is_none() {
            errors.push(ValidationError::new(
                format!("{}.chain_id", prefix),
                format!("'{}' is not a 0x-prefixed hex chain id", entry.chain_id),
            ));
        }
        if entry.token_contract_address.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                format!("{}.token_contract_address", prefix),
                format!("'{}' is not an address", entry.token_contract_address),
            ));
        }
        if Url::parse(&entry.rpc_url).is_err() {
            errors.push(ValidationError::new(
                format!("{}.rpc_url", prefix),
                format!("'{}' is not a valid URL", entry.rpc_url),
            ));
        }
        if entry.display_name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{}.display_name", prefix),
                "must not be empty",
            ));
        }
    }

    let transfer = &config.transfer;
    if transfer.recipient.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "transfer.recipient",
            format!("'{}' is not an address", transfer.recipient),
        ));
    }
    if let Err(e) = to_smallest_units(&transfer.amount, transfer.token_decimals) {
        errors.push(ValidationError::new("transfer.amount", e.to_string()));
    }
    if transfer.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "transfer.confirmation_timeout_secs",
            "must be greater than zero",
        ));
    }
    if transfer.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "transfer.receipt_poll_interval_ms",
            "must be greater than zero",
        ));
    }

    if config.wallet.enabled && config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new("wallet.private_key_env", "must not be empty"));
    }
    if config.wallet.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("wallet.rpc_timeout_secs", "must be greater than zero"));
    }

    if config.history.enabled && Url::parse(&config.history.endpoint).is_err() {
        errors.push(ValidationError::new(
            "history.endpoint",
            format!("'{}' is not a valid URL", config.history.endpoint),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
