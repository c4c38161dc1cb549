//! Current provider/signer pair for the selected source network.
//!
//! # Responsibilities
//! - Build the provider for the environment (wallet or read-only RPC)
//! - Obtain a signer when a wallet is present
//! - Replace the whole pair when the source network changes
//!
//! # Design Decisions
//! - Sessions are immutable snapshots published through `ArcSwapOption`
//! - Re-initialization holds a write gate; actions that need the current
//!   pair take the read side, so they never see a pair from a superseded
//!   network selection
//! - In-flight operations keep the snapshot they started with

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::BridgeResult;
use crate::network::{NetworkName, NetworkRegistry};
use crate::observability::metrics;
use crate::session::provider::{ChainProvider, ReadOnlyProvider};
use crate::wallet::{WalletExtension, WalletSigner};

/// One generation of session state.
#[derive(Debug, Clone)]
pub struct Session {
    /// Monotonic counter, bumped on every initialization.
    pub generation: u64,
    pub source_network: NetworkName,
    pub provider: Arc<ChainProvider>,
    pub signer: Option<Arc<WalletSigner>>,
    pub wallet_address: Option<Address>,
}

/// Owner of the current [`Session`].
pub struct ProviderSession {
    registry: Arc<NetworkRegistry>,
    extension: Option<Arc<dyn WalletExtension>>,
    current: ArcSwapOption<Session>,
    gate: RwLock<()>,
    generation: AtomicU64,
    rpc_timeout: Duration,
}

impl ProviderSession {
    /// Create an uninitialized session owner.
    ///
    /// `extension` is the result of wallet detection; `None` means the
    /// environment has no wallet and every session will be read-only.
    pub fn new(
        registry: Arc<NetworkRegistry>,
        extension: Option<Arc<dyn WalletExtension>>,
        rpc_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            extension,
            current: ArcSwapOption::empty(),
            gate: RwLock::new(()),
            generation: AtomicU64::new(0),
            rpc_timeout,
        }
    }

    /// Build and publish a fresh provider/signer pair for `source`.
    pub async fn initialize(&self, source: NetworkName) -> BridgeResult<()> {
        let _guard = self.gate.write().await;
        let network = self.registry.config(source)?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (provider, signer) = match &self.extension {
            Some(extension) => {
                let signer =
                    match WalletSigner::acquire(extension.clone(), source, generation).await {
                        Ok(signer) => Some(Arc::new(signer)),
                        Err(e) => {
                            tracing::warn!(
                                network = %source,
                                error = %e,
                                "Signer could not be obtained; session is read-only"
                            );
                            None
                        }
                    };
                (ChainProvider::Interactive(extension.clone()), signer)
            }
            None => {
                tracing::info!(
                    network = %source,
                    rpc_url = %network.rpc_url,
                    "No wallet extension; using read-only provider for selected network"
                );
                (
                    ChainProvider::ReadOnly(ReadOnlyProvider::new(network, self.rpc_timeout)),
                    None,
                )
            }
        };

        // Keep the connected address only if the new signer is the same account.
        let previous = self.current.load_full();
        let wallet_address = previous
            .as_ref()
            .and_then(|s| s.wallet_address)
            .filter(|addr| signer.as_ref().is_some_and(|s| s.address() == *addr));

        let mode = provider.mode();
        self.current.store(Some(Arc::new(Session {
            generation,
            source_network: source,
            provider: Arc::new(provider),
            signer,
            wallet_address,
        })));

        metrics::record_session_init(source, mode);
        tracing::info!(
            network = %source,
            generation,
            mode = %mode,
            "Provider session initialized"
        );
        Ok(())
    }

    /// Handle a change of the selected source network.
    ///
    /// Returns `true` when a new session was published.
    pub async fn on_source_network_changed(&self, source: NetworkName) -> BridgeResult<bool> {
        if let Some(current) = self.current.load_full() {
            if current.source_network == source {
                tracing::debug!(network = %source, "Source network unchanged");
                return Ok(false);
            }
        }
        self.initialize(source).await?;
        Ok(true)
    }

    /// The session new actions must use. Waits for a pending re-initialization.
    pub async fn current(&self) -> Option<Arc<Session>> {
        let _guard = self.gate.read().await;
        self.current.load_full()
    }

    /// Latest published session, without waiting. For display only.
    pub fn snapshot(&self) -> Option<Arc<Session>> {
        self.current.load_full()
    }

    /// Record the connected address on the session of `generation`.
    ///
    /// Ignored when that session has already been superseded.
    pub async fn set_wallet_address(&self, generation: u64, address: Address) -> bool {
        let _guard = self.gate.write().await;
        let Some(current) = self.current.load_full() else {
            return false;
        };
        if current.generation != generation {
            tracing::debug!(
                generation,
                current = current.generation,
                "Discarding wallet address for superseded session"
            );
            return false;
        }

        let mut updated = (*current).clone();
        updated.wallet_address = Some(address);
        self.current.store(Some(Arc::new(updated)));
        true
    }
}

impl std::fmt::Debug for ProviderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSession")
            .field("has_extension", &self.extension.is_some())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("current", &self.current.load_full())
            .finish()
    }
}
