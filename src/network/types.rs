//! Network identifiers and resolved network parameters.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::BridgeError;

/// Supported source/destination networks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NetworkName {
    /// Ethereum Sepolia testnet (chain ID 11155111).
    #[default]
    Sepolia,
    /// Base Sepolia testnet (chain ID 84532).
    BaseSepolia,
}

impl NetworkName {
    /// All supported networks, in selector order.
    pub const ALL: [NetworkName; 2] = [NetworkName::Sepolia, NetworkName::BaseSepolia];

    /// The network on the other side of the bridge.
    pub fn counterpart(self) -> NetworkName {
        match self {
            NetworkName::Sepolia => NetworkName::BaseSepolia,
            NetworkName::BaseSepolia => NetworkName::Sepolia,
        }
    }

    /// Registry key.
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkName::Sepolia => "Sepolia",
            NetworkName::BaseSepolia => "BaseSepolia",
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkName {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sepolia" => Ok(NetworkName::Sepolia),
            "basesepolia" | "base-sepolia" | "base_sepolia" => Ok(NetworkName::BaseSepolia),
            _ => Err(BridgeError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Resolved, immutable parameters of one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Registry key.
    pub name: NetworkName,
    /// Chain ID exactly as configured (hex string, e.g. "0xAA36A7").
    pub chain_id_hex: String,
    /// Numeric chain ID parsed from `chain_id_hex`.
    pub chain_id: u64,
    /// Token (USDC) contract on this network.
    pub token_contract_address: Address,
    /// Public JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Human-readable name ("Base Sepolia").
    pub display_name: String,
}

/// Parse a `0x`-prefixed hex chain ID.
pub fn parse_chain_id_hex(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart_is_involution() {
        for name in NetworkName::ALL {
            assert_ne!(name.counterpart(), name);
            assert_eq!(name.counterpart().counterpart(), name);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Sepolia".parse::<NetworkName>().unwrap(), NetworkName::Sepolia);
        assert_eq!("base-sepolia".parse::<NetworkName>().unwrap(), NetworkName::BaseSepolia);
        assert_eq!("BaseSepolia".parse::<NetworkName>().unwrap(), NetworkName::BaseSepolia);

        let err = "Holesky".parse::<NetworkName>().unwrap_err();
        assert!(matches!(err, BridgeError::UnknownNetwork(ref n) if n == "Holesky"));
    }

    #[test]
    fn test_parse_chain_id_hex() {
        assert_eq!(parse_chain_id_hex("0xAA36A7"), Some(11_155_111));
        assert_eq!(parse_chain_id_hex("0x14A34"), Some(84_532));
        assert_eq!(parse_chain_id_hex("14A34"), None);
        assert_eq!(parse_chain_id_hex("0x"), None);
        assert_eq!(parse_chain_id_hex("0xZZ"), None);
    }
}
