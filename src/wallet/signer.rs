//! Signing handle bound to one session generation.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;

use crate::network::NetworkName;
use crate::wallet::extension::{WalletError, WalletExtension, WalletResult};

/// An account the wallet will sign for.
///
/// A signer belongs to the session generation that created it. A network
/// change produces a new signer; existing handles keep their original
/// network and generation.
#[derive(Clone)]
pub struct WalletSigner {
    extension: Arc<dyn WalletExtension>,
    address: Address,
    network: NetworkName,
    generation: u64,
}

impl WalletSigner {
    /// Obtain a signer from the wallet.
    ///
    /// Uses an already-authorized account when there is one, otherwise asks
    /// the wallet for authorization.
    pub async fn acquire(
        extension: Arc<dyn WalletExtension>,
        network: NetworkName,
        generation: u64,
    ) -> WalletResult<Self> {
        let mut accounts = extension.accounts().await?;
        if accounts.is_empty() {
            accounts = extension.request_accounts().await?;
        }
        let address = accounts.first().copied().ok_or(WalletError::Unauthorized)?;

        Ok(Self {
            extension,
            address,
            network,
            generation,
        })
    }

    /// Signing account.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Source network selected when this signer was obtained.
    pub fn network(&self) -> NetworkName {
        self.network
    }

    /// Session generation this signer belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Submit a transaction from this account.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash> {
        self.extension
            .send_transaction(tx.with_from(self.address))
            .await
    }
}

impl std::fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSigner")
            .field("address", &self.address)
            .field("network", &self.network)
            .field("generation", &self.generation)
            .finish()
    }
}
