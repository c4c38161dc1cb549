//! Wallet chain alignment before a transfer.

use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult};
use crate::network::{NetworkName, NetworkRegistry};
use crate::observability::metrics;
use crate::session::Session;
use crate::wallet::AddChainParams;

/// What `ensure_network` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet was already on the target chain; no request was made.
    AlreadyActive,
    /// One add/switch request was issued and accepted.
    Switched { from: u64, to: u64 },
}

/// Makes the wallet's active chain match the selected source network.
#[derive(Debug, Clone)]
pub struct NetworkSwitcher {
    registry: Arc<NetworkRegistry>,
}

impl NetworkSwitcher {
    pub fn new(registry: Arc<NetworkRegistry>) -> Self {
        Self { registry }
    }

    /// Ensure the session's wallet is on `target`.
    ///
    /// Issues at most one `wallet_addEthereumChain` request. Any refusal,
    /// or the absence of a wallet, is reported as
    /// [`BridgeError::ChainSwitchRejected`].
    pub async fn ensure_network(
        &self,
        session: &Session,
        target: NetworkName,
    ) -> BridgeResult<SwitchOutcome> {
        let network = self.registry.config(target)?;
        let Some(extension) = session.provider.extension() else {
            metrics::record_chain_switch(target, "rejected");
            return Err(BridgeError::ChainSwitchRejected(
                "no wallet extension available".to_string(),
            ));
        };

        let active = session.provider.chain_id().await.map_err(|e| {
            metrics::record_chain_switch(target, "rejected");
            BridgeError::ChainSwitchRejected(format!("could not read active chain: {}", e))
        })?;

        if active == network.chain_id {
            tracing::debug!(network = %target, chain_id = active, "Wallet already on target chain");
            metrics::record_chain_switch(target, "already_active");
            return Ok(SwitchOutcome::AlreadyActive);
        }

        tracing::info!(
            network = %target,
            from = active,
            to = network.chain_id,
            "Requesting wallet chain switch"
        );
        let params = AddChainParams::for_network(network);
        extension.add_ethereum_chain(&params).await.map_err(|e| {
            tracing::warn!(network = %target, error = %e, code = e.code(), "Chain switch failed");
            metrics::record_chain_switch(target, "rejected");
            BridgeError::ChainSwitchRejected(e.to_string())
        })?;

        metrics::record_chain_switch(target, "switched");
        Ok(SwitchOutcome::Switched {
            from: active,
            to: network.chain_id,
        })
    }
}
