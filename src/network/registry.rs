//! Static table of supported networks.
//!
//! Built once from validated configuration. Lookups are pure.

use alloy::primitives::Address;
use std::collections::BTreeMap;
use url::Url;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::network::types::{parse_chain_id_hex, NetworkConfig, NetworkName};

/// Registry of supported networks and their bridge counterparts.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: BTreeMap<NetworkName, NetworkConfig>,
}

impl NetworkRegistry {
    /// Build the registry from configuration.
    ///
    /// Every supported network must be present and well-formed; a registry
    /// with a missing counterpart would let the selector reference a name
    /// the table cannot resolve.
    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        let mut networks = BTreeMap::new();

        for name in NetworkName::ALL {
            let entry = config
                .networks
                .get(&name)
                .ok_or_else(|| BridgeError::UnknownNetwork(name.to_string()))?;

            let chain_id = parse_chain_id_hex(&entry.chain_id).ok_or_else(|| {
                BridgeError::UnknownNetwork(format!("{} (bad chain id '{}')", name, entry.chain_id))
            })?;
            let token_contract_address: Address =
                entry.token_contract_address.parse().map_err(|_| {
                    BridgeError::UnknownNetwork(format!(
                        "{} (bad token address '{}')",
                        name, entry.token_contract_address
                    ))
                })?;
            let rpc_url = Url::parse(&entry.rpc_url).map_err(|e| {
                BridgeError::UnknownNetwork(format!("{} (bad RPC URL: {})", name, e))
            })?;

            networks.insert(
                name,
                NetworkConfig {
                    name,
                    chain_id_hex: entry.chain_id.clone(),
                    chain_id,
                    token_contract_address,
                    rpc_url,
                    display_name: entry.display_name.clone(),
                },
            );
        }

        tracing::debug!(networks = networks.len(), "Network registry built");
        Ok(Self { networks })
    }

    /// Look a network up by its name as it appears in the selector.
    pub fn get(&self, name: &str) -> BridgeResult<&NetworkConfig> {
        let parsed: NetworkName = name.parse()?;
        self.networks
            .get(&parsed)
            .ok_or_else(|| BridgeError::UnknownNetwork(name.to_string()))
    }

    /// Look a network up by typed name.
    pub fn config(&self, name: NetworkName) -> BridgeResult<&NetworkConfig> {
        self.networks
            .get(&name)
            .ok_or_else(|| BridgeError::UnknownNetwork(name.to_string()))
    }

    /// Destination implied by a source network.
    pub fn destination_of(&self, source: NetworkName) -> NetworkName {
        source.counterpart()
    }

    /// Find the network a numeric chain ID belongs to.
    pub fn by_chain_id(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.networks.values().find(|n| n.chain_id == chain_id)
    }

    /// Iterate over all networks in selector order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.values()
    }
}
