//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge
//! console. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::network::NetworkName;

/// Recipient of the fixed bridge transfer.
pub const DEFAULT_RECIPIENT: &str = "0x7f7346b12Ec7d7aa8fAD8Bc5E0a914919368a139";

/// Root configuration for the bridge console.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Source network selected at startup.
    pub source_network: NetworkName,

    /// Supported networks keyed by name.
    pub networks: BTreeMap<NetworkName, NetworkEntry>,

    /// Fixed transfer parameters.
    pub transfer: TransferConfig,

    /// Wallet extension settings.
    pub wallet: WalletConfig,

    /// History backend settings.
    pub history: HistoryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            NetworkName::Sepolia,
            NetworkEntry {
                chain_id: "0xAA36A7".to_string(),
                token_contract_address: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238".to_string(),
                rpc_url: "https://rpc.sepolia.org".to_string(),
                display_name: "Sepolia".to_string(),
            },
        );
        networks.insert(
            NetworkName::BaseSepolia,
            NetworkEntry {
                chain_id: "0x14A34".to_string(),
                token_contract_address: "0x036CbD53842c5426634e7929541eC2318f3dCF7e".to_string(),
                rpc_url: "https://sepolia.base.org".to_string(),
                display_name: "Base Sepolia".to_string(),
            },
        );

        Self {
            source_network: NetworkName::Sepolia,
            networks,
            transfer: TransferConfig::default(),
            wallet: WalletConfig::default(),
            history: HistoryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Raw network parameters as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NetworkEntry {
    /// Hex chain ID (e.g. "0xAA36A7").
    pub chain_id: String,

    /// Token contract address on this network.
    pub token_contract_address: String,

    /// JSON-RPC endpoint used for read-only access and chain registration.
    pub rpc_url: String,

    /// Name shown to the user and passed to the wallet when adding the chain.
    pub display_name: String,
}

/// Fixed transfer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Recipient address.
    pub recipient: String,

    /// Human-readable amount, as a decimal string.
    pub amount: String,

    /// Token decimal precision used for smallest-unit scaling.
    pub token_decimals: u8,

    /// Token symbol for display.
    pub token_symbol: String,

    /// Upper bound on the wait for the first confirmation, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            amount: "0.123".to_string(),
            token_decimals: 6,
            token_symbol: "USDC".to_string(),
            confirmation_timeout_secs: 120,
            receipt_poll_interval_ms: 2000,
        }
    }
}

/// Wallet extension configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Allow the local wallet extension to be detected at all.
    pub enabled: bool,

    /// Environment variable holding the extension's private key.
    pub private_key_env: String,

    /// Approve every wallet prompt without asking.
    pub auto_approve: bool,

    /// Timeout for RPC calls issued by the extension, in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            private_key_env: "BRIDGE_WALLET_PRIVATE_KEY".to_string(),
            auto_approve: false,
            rpc_timeout_secs: 10,
        }
    }
}

/// History backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Fetch history on startup.
    pub enabled: bool,

    /// URL returning a JSON array of history records.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:4943/data_history".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
