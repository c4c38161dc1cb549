//! User-facing action boundary.
//!
//! # Responsibilities
//! - Own the session, connector, executor and history view
//! - Expose the connect, source-selection and transfer actions
//! - Convert every failure into a user-visible [`ActionOutcome`]
//!
//! # Design Decisions
//! - Errors stop here; no action propagates an error to the caller
//! - The destination is always derived from the source, never set directly

use alloy::primitives::{Address, TxHash};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::validation::validate_config;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::history::{HistoryRecord, HistorySource, HistoryView};
use crate::network::{NetworkName, NetworkRegistry};
use crate::session::{ProviderMode, ProviderSession};
use crate::transfer::{TransferExecutor, TransferSettings, TransferState};
use crate::wallet::{WalletConnector, WalletExtension};

/// Result of a user action, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success(String),
    Failed { message: String, retryable: bool },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ActionOutcome::Success(message) => message,
            ActionOutcome::Failed { message, .. } => message,
        }
    }

    fn from_error(action: &'static str, error: &BridgeError) -> Self {
        tracing::warn!(action, kind = error.kind(), error = %error, "Action failed");
        ActionOutcome::Failed {
            message: error.user_message(),
            retryable: error.is_retryable(),
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Provider mode, chain and head of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStatus {
    pub network: NetworkName,
    pub mode: ProviderMode,
    pub chain_id: Option<u64>,
    /// Display name of `chain_id` when it is a supported network.
    pub chain_name: Option<String>,
    pub latest_block: Option<u64>,
    pub wallet_address: Option<Address>,
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<u64>| v.map_or_else(|| "unavailable".to_string(), |v| v.to_string());
        let chain = match (&self.chain_name, self.chain_id) {
            (Some(name), Some(id)) => format!("{} ({})", id, name),
            _ => show(self.chain_id),
        };
        write!(
            f,
            "network: {}\nmode: {}\nchain id: {}\nlatest block: {}\nwallet: {}",
            self.network,
            self.mode,
            chain,
            show(self.latest_block),
            self.wallet_address
                .map_or_else(|| "not connected".to_string(), |a| a.to_string()),
        )
    }
}

/// The bridge console: one owner for all session-dependent components.
pub struct BridgeApp {
    registry: Arc<NetworkRegistry>,
    session: Arc<ProviderSession>,
    connector: WalletConnector,
    executor: TransferExecutor,
    history: HistoryView,
    transaction_hash: Option<TxHash>,
}

impl BridgeApp {
    /// Validate `config`, build the components, initialize the session for
    /// the configured source network and load history when enabled.
    pub async fn start(
        config: &BridgeConfig,
        extension: Option<Arc<dyn WalletExtension>>,
        history: Arc<dyn HistorySource>,
    ) -> BridgeResult<Self> {
        validate_config(config).map_err(|errors| {
            BridgeError::InvalidConfig(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;
        let registry = Arc::new(NetworkRegistry::from_config(config)?);
        let settings = TransferSettings::from_config(&config.transfer)
            .map_err(|e| BridgeError::InvalidConfig(e.to_string()))?;
        let session = Arc::new(ProviderSession::new(
            registry.clone(),
            extension,
            Duration::from_secs(config.wallet.rpc_timeout_secs),
        ));
        session.initialize(config.source_network).await?;

        let mut app = Self {
            connector: WalletConnector::new(session.clone()),
            executor: TransferExecutor::new(session.clone(), registry.clone(), settings),
            history: HistoryView::new(history),
            registry,
            session,
            transaction_hash: None,
        };
        if config.history.enabled {
            app.history.load().await;
        }
        Ok(app)
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Arc<ProviderSession> {
        &self.session
    }

    pub fn source_network(&self) -> NetworkName {
        self.session
            .snapshot()
            .map(|s| s.source_network)
            .unwrap_or_default()
    }

    /// Display name of the counterpart of the selected source.
    pub fn destination_label(&self) -> String {
        let destination = self.registry.destination_of(self.source_network());
        self.registry
            .config(destination)
            .map(|n| n.display_name.clone())
            .unwrap_or_else(|_| destination.to_string())
    }

    pub fn wallet_address(&self) -> Option<Address> {
        self.session.snapshot().and_then(|s| s.wallet_address)
    }

    /// Hash of the last confirmed transfer.
    pub fn transaction_hash(&self) -> Option<TxHash> {
        self.transaction_hash
    }

    pub fn history(&self) -> &[HistoryRecord] {
        self.history.records()
    }

    pub fn transfer_state(&self) -> watch::Receiver<TransferState> {
        self.executor.subscribe()
    }

    /// Source selector. Re-initializes the session when the choice changes.
    pub async fn select_source_network(&mut self, name: &str) -> ActionOutcome {
        let result = async {
            let source: NetworkName = name.parse()?;
            self.session.on_source_network_changed(source).await?;
            Ok::<_, BridgeError>(source)
        }
        .await;

        match result {
            Ok(source) => ActionOutcome::Success(format!(
                "Source: {}, destination: {}",
                self.registry
                    .config(source)
                    .map(|n| n.display_name.as_str())
                    .unwrap_or(source.as_str()),
                self.destination_label()
            )),
            Err(e) => ActionOutcome::from_error("select_source_network", &e),
        }
    }

    pub async fn connect(&mut self) -> ActionOutcome {
        match self.connector.connect().await {
            Ok(address) => ActionOutcome::Success(format!("Connected: {}", address)),
            Err(e) => ActionOutcome::from_error("connect", &e),
        }
    }

    /// Transfer action. Records the transaction hash on success.
    pub async fn send(&mut self) -> ActionOutcome {
        match self.executor.send_fixed_transfer().await {
            Ok(result) => {
                self.transaction_hash = Some(result.transaction_hash);
                let settings = self.executor.settings();
                ActionOutcome::Success(format!(
                    "Sent {} {} on {}. Transaction: {}",
                    settings.amount_display,
                    settings.token_symbol,
                    result.network,
                    result.transaction_hash
                ))
            }
            Err(e) => ActionOutcome::from_error("send", &e),
        }
    }

    /// Re-fetch history and hold it for display.
    pub async fn load_history(&mut self) -> &[HistoryRecord] {
        self.history.load().await
    }

    /// Read mode, chain id and latest block through the current provider.
    pub async fn status(&self) -> Option<ChainStatus> {
        let session = self.session.current().await?;
        let chain_id = match session.provider.chain_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "Chain id unavailable");
                None
            }
        };
        let latest_block = match session.provider.block_number().await {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(error = %e, "Latest block unavailable");
                None
            }
        };
        let chain_name = chain_id
            .and_then(|id| self.registry.by_chain_id(id))
            .map(|n| n.display_name.clone());
        Some(ChainStatus {
            network: session.source_network,
            mode: session.provider.mode(),
            chain_id,
            chain_name,
            latest_block,
            wallet_address: session.wallet_address,
        })
    }
}
