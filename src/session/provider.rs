//! Chain read access, through the wallet or directly over RPC.
//!
//! # Responsibilities
//! - Query chain state (chain ID, block number, receipts)
//! - Enforce timeouts on direct RPC calls
//! - Expose the wallet extension when the session is interactive

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::network::{NetworkConfig, NetworkName};
use crate::wallet::extension::{
    with_rpc_timeout, TxConfirmation, WalletError, WalletExtension, WalletResult,
};

/// How the session reaches the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    /// Through the wallet extension; transactions possible.
    Interactive,
    /// Directly to the network's public RPC; reads only.
    ReadOnly,
}

impl fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderMode::Interactive => f.write_str("interactive"),
            ProviderMode::ReadOnly => f.write_str("read-only"),
        }
    }
}

/// Direct JSON-RPC connection to one network.
#[derive(Clone)]
pub struct ReadOnlyProvider {
    network: NetworkName,
    chain_id: u64,
    rpc_url: Url,
    inner: Arc<dyn Provider + Send + Sync>,
    timeout: Duration,
}

impl ReadOnlyProvider {
    pub fn new(network: &NetworkConfig, timeout: Duration) -> Self {
        let inner = Arc::new(ProviderBuilder::new().connect_http(network.rpc_url.clone()))
            as Arc<dyn Provider + Send + Sync>;
        Self {
            network: network.name,
            chain_id: network.chain_id,
            rpc_url: network.rpc_url.clone(),
            inner,
            timeout,
        }
    }

    pub fn network(&self) -> NetworkName {
        self.network
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

impl fmt::Debug for ReadOnlyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyProvider")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}

/// Connection handle held by a session.
#[derive(Clone)]
pub enum ChainProvider {
    Interactive(Arc<dyn WalletExtension>),
    ReadOnly(ReadOnlyProvider),
}

impl ChainProvider {
    pub fn mode(&self) -> ProviderMode {
        match self {
            ChainProvider::Interactive(_) => ProviderMode::Interactive,
            ChainProvider::ReadOnly(_) => ProviderMode::ReadOnly,
        }
    }

    /// The wallet extension, when this provider goes through one.
    pub fn extension(&self) -> Option<&Arc<dyn WalletExtension>> {
        match self {
            ChainProvider::Interactive(extension) => Some(extension),
            ChainProvider::ReadOnly(_) => None,
        }
    }

    /// Chain the provider is currently talking to.
    pub async fn chain_id(&self) -> WalletResult<u64> {
        match self {
            ChainProvider::Interactive(extension) => extension.chain_id().await,
            ChainProvider::ReadOnly(ro) => {
                with_rpc_timeout(ro.timeout, ro.inner.get_chain_id()).await
            }
        }
    }

    /// Latest block number.
    pub async fn block_number(&self) -> WalletResult<u64> {
        match self {
            ChainProvider::Interactive(extension) => extension.block_number().await,
            ChainProvider::ReadOnly(ro) => {
                with_rpc_timeout(ro.timeout, ro.inner.get_block_number()).await
            }
        }
    }

    /// Receipt of a transaction submitted on `chain_id`, `None` while pending.
    pub async fn transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> WalletResult<Option<TxConfirmation>> {
        match self {
            ChainProvider::Interactive(extension) => {
                extension.transaction_receipt(chain_id, tx_hash).await
            }
            ChainProvider::ReadOnly(ro) if ro.chain_id != chain_id => {
                Err(WalletError::InvalidRequest(format!(
                    "{} provider cannot read chain {}",
                    ro.network, chain_id
                )))
            }
            ChainProvider::ReadOnly(ro) => {
                let receipt =
                    with_rpc_timeout(ro.timeout, ro.inner.get_transaction_receipt(tx_hash)).await?;
                Ok(receipt.map(|r| TxConfirmation {
                    transaction_hash: r.transaction_hash,
                    block_number: r.block_number,
                    success: r.status(),
                }))
            }
        }
    }
}

impl fmt::Debug for ChainProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainProvider::Interactive(_) => f.write_str("ChainProvider::Interactive"),
            ChainProvider::ReadOnly(ro) => f.debug_tuple("ChainProvider::ReadOnly").field(ro).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::network::NetworkRegistry;

    #[test]
    fn test_read_only_provider() {
        let registry = NetworkRegistry::from_config(&BridgeConfig::default()).unwrap();
        let net = registry.config(NetworkName::BaseSepolia).unwrap();
        let provider = ChainProvider::ReadOnly(ReadOnlyProvider::new(net, Duration::from_secs(5)));

        assert_eq!(provider.mode(), ProviderMode::ReadOnly);
        assert!(provider.extension().is_none());
        match &provider {
            ChainProvider::ReadOnly(ro) => {
                assert_eq!(ro.network(), NetworkName::BaseSepolia);
                assert_eq!(ro.rpc_url().host_str(), Some("sepolia.base.org"));
            }
            ChainProvider::Interactive(_) => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_unreachable_rpc_fails() {
        let mut config = BridgeConfig::default();
        if let Some(entry) = config.networks.get_mut(&NetworkName::Sepolia) {
            entry.rpc_url = "http://127.0.0.1:1".to_string();
        }
        let registry = NetworkRegistry::from_config(&config).unwrap();
        let net = registry.config(NetworkName::Sepolia).unwrap();
        let provider = ChainProvider::ReadOnly(ReadOnlyProvider::new(net, Duration::from_secs(2)));

        assert!(provider.block_number().await.is_err());
    }

    #[tokio::test]
    async fn test_read_only_receipt_for_other_chain() {
        let registry = NetworkRegistry::from_config(&BridgeConfig::default()).unwrap();
        let net = registry.config(NetworkName::BaseSepolia).unwrap();
        let provider = ChainProvider::ReadOnly(ReadOnlyProvider::new(net, Duration::from_secs(2)));

        let result = provider
            .transaction_receipt(11_155_111, TxHash::repeat_byte(0x22))
            .await;
        assert!(matches!(result, Err(WalletError::InvalidRequest(_))));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ProviderMode::Interactive.to_string(), "interactive");
        assert_eq!(ProviderMode::ReadOnly.to_string(), "read-only");
    }
}
