//! Key-backed wallet extension.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//! - Every authorization, chain change and transaction goes through the
//!   configured [`Approver`]

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

use crate::config::WalletConfig;
use crate::network::types::parse_chain_id_hex;
use crate::network::NetworkConfig;
use crate::wallet::extension::{
    with_rpc_timeout, AddChainParams, Approver, TxConfirmation, WalletError, WalletExtension,
    WalletPrompt, WalletResult,
};

/// A chain the wallet knows how to reach.
struct KnownChain {
    name: String,
    rpc_url: Url,
    provider: Arc<dyn Provider + Send + Sync>,
}

/// Wallet extension backed by a local private key.
pub struct LocalWalletExtension {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chains registered with the wallet, by chain ID.
    chains: RwLock<HashMap<u64, KnownChain>>,
    /// Chain the wallet currently operates on.
    active_chain: AtomicU64,
    /// Whether the site has been granted account access.
    authorized: AtomicBool,
    approver: Approver,
    rpc_timeout: Duration,
}

impl LocalWalletExtension {
    /// Create an extension from a hex-encoded private key.
    ///
    /// `home` is the only chain the wallet knows initially; other chains
    /// must be added with `wallet_addEthereumChain`.
    pub fn from_private_key(
        private_key_hex: &str,
        home: &NetworkConfig,
        approver: Approver,
        rpc_timeout: Duration,
    ) -> WalletResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            WalletError::InvalidRequest(format!("Invalid private key format: {}", e))
        })?;

        let mut chains = HashMap::new();
        chains.insert(
            home.chain_id,
            KnownChain {
                name: home.display_name.clone(),
                rpc_url: home.rpc_url.clone(),
                provider: connect(home.rpc_url.clone()),
            },
        );

        tracing::info!(
            address = %signer.address(),
            home_chain = home.chain_id,
            "Local wallet extension initialized"
        );

        Ok(Self {
            signer,
            chains: RwLock::new(chains),
            active_chain: AtomicU64::new(home.chain_id),
            authorized: AtomicBool::new(false),
            approver,
            rpc_timeout,
        })
    }

    /// Detect the extension from the environment.
    ///
    /// Returns `None` when the extension is disabled or its key variable is
    /// unset; that is the "no wallet installed" case, not an error.
    pub fn detect(
        config: &WalletConfig,
        home: &NetworkConfig,
        approver: Approver,
    ) -> Option<Self> {
        if !config.enabled {
            tracing::info!("Wallet extension disabled by configuration");
            return None;
        }

        let private_key = match std::env::var(&config.private_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::info!(
                    env_var = %config.private_key_env,
                    "Wallet extension not installed (key variable unset)"
                );
                return None;
            }
        };

        let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);
        match Self::from_private_key(&private_key, home, approver, rpc_timeout) {
            Ok(extension) => Some(extension),
            Err(e) => {
                tracing::error!(error = %e, "Wallet extension failed to load");
                None
            }
        }
    }

    /// The account this extension exposes.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    async fn approve(&self, prompt: WalletPrompt) -> bool {
        let approver = self.approver.clone();
        let shown = prompt.to_string();
        let approved = tokio::task::spawn_blocking(move || approver(&prompt))
            .await
            .unwrap_or(false);
        tracing::debug!(prompt = %shown, approved, "Wallet prompt answered");
        approved
    }

    async fn active(&self) -> WalletResult<(u64, Url, Arc<dyn Provider + Send + Sync>)> {
        let chain_id = self.active_chain.load(Ordering::SeqCst);
        let (rpc_url, provider) = self.registered(chain_id).await?;
        Ok((chain_id, rpc_url, provider))
    }

    async fn registered(&self, chain_id: u64) -> WalletResult<(Url, Arc<dyn Provider + Send + Sync>)> {
        let chains = self.chains.read().await;
        let chain = chains
            .get(&chain_id)
            .ok_or_else(|| WalletError::Rpc(format!("Chain {} is not registered", chain_id)))?;
        Ok((chain.rpc_url.clone(), chain.provider.clone()))
    }
}

fn connect(url: Url) -> Arc<dyn Provider + Send + Sync> {
    Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>
}

#[async_trait]
impl WalletExtension for LocalWalletExtension {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        if self.authorized.load(Ordering::SeqCst) {
            return Ok(vec![self.address()]);
        }

        if !self
            .approve(WalletPrompt::ConnectAccount {
                address: self.address(),
            })
            .await
        {
            return Err(WalletError::UserRejected);
        }

        self.authorized.store(true, Ordering::SeqCst);
        tracing::info!(address = %self.address(), "Account access granted");
        Ok(vec![self.address()])
    }

    async fn accounts(&self) -> WalletResult<Vec<Address>> {
        if self.authorized.load(Ordering::SeqCst) {
            Ok(vec![self.address()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> WalletResult<u64> {
        Ok(self.active_chain.load(Ordering::SeqCst))
    }

    async fn add_ethereum_chain(&self, params: &AddChainParams) -> WalletResult<()> {
        let chain_id = parse_chain_id_hex(&params.chain_id).ok_or_else(|| {
            WalletError::InvalidRequest(format!("Invalid chainId '{}'", params.chain_id))
        })?;
        let rpc_url = params
            .rpc_urls
            .first()
            .ok_or_else(|| WalletError::InvalidRequest("rpcUrls must not be empty".to_string()))
            .and_then(|u| {
                Url::parse(u).map_err(|e| WalletError::InvalidRequest(format!("Invalid RPC URL: {}", e)))
            })?;

        if self.active_chain.load(Ordering::SeqCst) == chain_id {
            return Ok(());
        }

        let known = self.chains.read().await.contains_key(&chain_id);
        if known {
            let prompt = WalletPrompt::SwitchChain {
                chain_id,
                chain_name: params.chain_name.clone(),
            };
            if !self.approve(prompt).await {
                return Err(WalletError::UserRejected);
            }
        } else {
            let prompt = WalletPrompt::AddChain {
                chain_id,
                chain_name: params.chain_name.clone(),
                rpc_url: rpc_url.to_string(),
            };
            if !self.approve(prompt).await {
                return Err(WalletError::UserRejected);
            }

            // The endpoint must actually serve the chain being registered.
            let provider = connect(rpc_url.clone());
            let reported = with_rpc_timeout(self.rpc_timeout, provider.get_chain_id()).await?;
            if reported != chain_id {
                return Err(WalletError::Rpc(format!(
                    "RPC endpoint reports chain {} but {} was requested",
                    reported, chain_id
                )));
            }

            self.chains.write().await.insert(
                chain_id,
                KnownChain {
                    name: params.chain_name.clone(),
                    rpc_url,
                    provider,
                },
            );
            tracing::info!(chain_id, chain_name = %params.chain_name, "Chain added to wallet");
        }

        let previous = self.active_chain.swap(chain_id, Ordering::SeqCst);
        tracing::info!(from = previous, to = chain_id, "Wallet switched chain");
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash> {
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(WalletError::Unauthorized);
        }
        if let Some(from) = tx.from {
            if from != self.address() {
                return Err(WalletError::InvalidRequest(format!(
                    "Account {} is not managed by this wallet",
                    from
                )));
            }
        }

        let (chain_id, rpc_url, _) = self.active().await?;
        let prompt = WalletPrompt::SendTransaction {
            chain_id,
            from: self.address(),
            to: tx.to.and_then(|kind| kind.to().copied()),
        };
        if !self.approve(prompt).await {
            return Err(WalletError::UserRejected);
        }

        let chain_name = self
            .chains
            .read()
            .await
            .get(&chain_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);
        let tx = tx.with_from(self.address()).with_chain_id(chain_id);

        let pending = with_rpc_timeout(self.rpc_timeout, provider.send_transaction(tx)).await?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(tx_hash = %tx_hash, chain_id, chain = %chain_name, "Transaction broadcast");
        Ok(tx_hash)
    }

    async fn block_number(&self) -> WalletResult<u64> {
        let (_, _, provider) = self.active().await?;
        with_rpc_timeout(self.rpc_timeout, provider.get_block_number()).await
    }

    async fn transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> WalletResult<Option<TxConfirmation>> {
        let (_, provider) = self.registered(chain_id).await?;
        let receipt =
            with_rpc_timeout(self.rpc_timeout, provider.get_transaction_receipt(tx_hash)).await?;
        Ok(receipt.map(|r| TxConfirmation {
            transaction_hash: r.transaction_hash,
            block_number: r.block_number,
            success: r.status(),
        }))
    }
}

impl std::fmt::Debug for LocalWalletExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWalletExtension")
            .field("address", &self.address())
            .field("active_chain", &self.active_chain.load(Ordering::SeqCst))
            .field("authorized", &self.authorized.load(Ordering::SeqCst))
            .finish()
    }
}
