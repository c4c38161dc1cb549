//! Wallet connection.
//!
//! # Responsibilities
//! - Request account authorization from the wallet extension
//! - Resolve the connected address through the session signer
//! - Record the address on the current session

use alloy::primitives::Address;
use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult};
use crate::session::ProviderSession;

/// Connects the user's wallet to the current session.
#[derive(Clone)]
pub struct WalletConnector {
    session: Arc<ProviderSession>,
}

impl WalletConnector {
    pub fn new(session: Arc<ProviderSession>) -> Self {
        Self { session }
    }

    /// Request account access and return the connected address.
    ///
    /// Fails with [`BridgeError::WalletUnavailable`] when no extension is
    /// present and [`BridgeError::AuthorizationDenied`] when the user (or the
    /// wallet) refuses.
    pub async fn connect(&self) -> BridgeResult<Address> {
        let current = self
            .session
            .current()
            .await
            .ok_or(BridgeError::WalletUnavailable)?;
        let extension = current
            .provider
            .extension()
            .ok_or(BridgeError::WalletUnavailable)?;

        let authorized = extension.request_accounts().await.map_err(|e| {
            tracing::warn!(error = %e, code = e.code(), "Wallet authorization failed");
            BridgeError::AuthorizationDenied(e.to_string())
        })?;

        // The session may have been initialized before access was granted.
        let current = if current.signer.is_some() {
            current
        } else {
            tracing::info!("Signer missing after authorization, re-initializing session");
            self.session.initialize(current.source_network).await?;
            self.session
                .current()
                .await
                .ok_or(BridgeError::WalletUnavailable)?
        };
        let signer = current.signer.as_ref().ok_or_else(|| {
            BridgeError::AuthorizationDenied("wallet exposed no account".to_string())
        })?;

        let address = signer.address();
        if !authorized.contains(&address) {
            tracing::warn!(address = %address, "Signer account not in authorized list");
        }

        if !self
            .session
            .set_wallet_address(current.generation, address)
            .await
        {
            self.record_on_latest(address).await?;
        }

        tracing::info!(
            address = %address,
            network = %current.source_network,
            "Wallet connected"
        );
        Ok(address)
    }

    /// The session changed while connecting. Carry the address over only
    /// when the replacement signer is the same account.
    async fn record_on_latest(&self, address: Address) -> BridgeResult<()> {
        let latest = self
            .session
            .current()
            .await
            .ok_or(BridgeError::WalletUnavailable)?;
        let same_account = latest
            .signer
            .as_ref()
            .is_some_and(|s| s.address() == address);

        if same_account
            && self
                .session
                .set_wallet_address(latest.generation, address)
                .await
        {
            tracing::debug!(generation = latest.generation, "Connected address moved to new session");
            return Ok(());
        }
        Err(BridgeError::AuthorizationDenied(
            "session changed during connect".to_string(),
        ))
    }
}
