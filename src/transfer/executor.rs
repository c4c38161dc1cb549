//! Fixed-amount token transfer.
//!
//! # Responsibilities
//! - Check the signer precondition before touching the chain
//! - Align the wallet with the source network
//! - Build, submit and confirm the token transfer
//!
//! # Design Decisions
//! - The attempt runs against the session snapshot taken at its start
//! - One receipt is enough; no further confirmations are polled
//! - The confirmation wait is bounded; failures are never retried here

use alloy::primitives::TxHash;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::Instrument;

use crate::error::{BridgeError, BridgeResult, TransferFailure};
use crate::network::NetworkRegistry;
use crate::observability::metrics;
use crate::session::{ChainProvider, ProviderSession, Session};
use crate::transfer::switcher::NetworkSwitcher;
use crate::transfer::token::transfer_request;
use crate::transfer::types::{TransferAttempt, TransferResult, TransferSettings, TransferState};
use crate::wallet::TxConfirmation;

/// Sends the configured transfer through the current session.
pub struct TransferExecutor {
    session: Arc<ProviderSession>,
    registry: Arc<NetworkRegistry>,
    switcher: NetworkSwitcher,
    settings: TransferSettings,
    state_tx: watch::Sender<TransferState>,
}

impl TransferExecutor {
    pub fn new(
        session: Arc<ProviderSession>,
        registry: Arc<NetworkRegistry>,
        settings: TransferSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(TransferState::Idle);
        Self {
            session,
            switcher: NetworkSwitcher::new(registry.clone()),
            registry,
            settings,
            state_tx,
        }
    }

    /// Observe the state of the most recent attempt.
    pub fn subscribe(&self) -> watch::Receiver<TransferState> {
        self.state_tx.subscribe()
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    /// Run one transfer attempt to completion.
    pub async fn send_fixed_transfer(&self) -> BridgeResult<TransferResult> {
        let session = self.session.current().await;
        let network = session
            .as_ref()
            .map(|s| s.source_network)
            .unwrap_or_default();
        let mut attempt = TransferAttempt::new(network);
        let span = tracing::info_span!(
            "transfer",
            attempt = %attempt.id(),
            network = %attempt.network()
        );

        async {
            self.publish(&attempt);
            let result = self.run(&mut attempt, session).await;
            match &result {
                Ok(done) => {
                    metrics::record_transfer(network, "succeeded");
                    tracing::info!(
                        tx_hash = %done.transaction_hash,
                        block = ?done.block_number,
                        "Transfer confirmed"
                    );
                }
                Err(e) => {
                    attempt.advance(TransferState::Failed {
                        reason: e.to_string(),
                    });
                    self.publish(&attempt);
                    metrics::record_transfer(network, e.kind());
                    tracing::warn!(error = %e, "Transfer attempt failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        attempt: &mut TransferAttempt,
        session: Option<Arc<Session>>,
    ) -> BridgeResult<TransferResult> {
        let session = session.ok_or(BridgeError::NoSigner)?;
        let signer = session.signer.clone().ok_or(BridgeError::NoSigner)?;
        let source = session.source_network;

        self.step(attempt, TransferState::SwitchingNetwork);
        self.switcher.ensure_network(&session, source).await?;

        self.step(attempt, TransferState::Submitting);
        let network = self.registry.config(source)?;
        let tx = transfer_request(
            network.token_contract_address,
            self.settings.recipient,
            self.settings.amount,
        );
        tracing::info!(
            token = %network.token_contract_address,
            recipient = %self.settings.recipient,
            amount = %self.settings.amount,
            from = %signer.address(),
            "Submitting token transfer"
        );
        let tx_hash = signer
            .send_transaction(tx)
            .await
            .map_err(TransferFailure::Wallet)?;

        self.step(attempt, TransferState::Confirming { tx_hash });
        // Receipts are read on the submitting chain even if the wallet has moved on.
        let receipt = self
            .wait_for_confirmation(&session.provider, network.chain_id, tx_hash)
            .await?;
        if !receipt.success {
            return Err(TransferFailure::Reverted(tx_hash).into());
        }

        self.step(attempt, TransferState::Succeeded { tx_hash });
        Ok(TransferResult {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            network: source,
            amount: self.settings.amount,
        })
    }

    /// Wait for the first receipt of `tx_hash` on `chain_id`, bounded by the
    /// configured timeout.
    async fn wait_for_confirmation(
        &self,
        provider: &ChainProvider,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<TxConfirmation, TransferFailure> {
        let limit = self.settings.confirmation_timeout;
        match timeout(limit, self.poll_receipt(provider, chain_id, tx_hash)).await {
            Ok(result) => result,
            Err(_) => Err(TransferFailure::ConfirmationTimeout {
                tx_hash,
                secs: limit.as_secs(),
            }),
        }
    }

    async fn poll_receipt(
        &self,
        provider: &ChainProvider,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<TxConfirmation, TransferFailure> {
        let mut ticker = interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match provider.transaction_receipt(chain_id, tx_hash).await? {
                Some(receipt) => return Ok(receipt),
                None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
            }
        }
    }

    fn step(&self, attempt: &mut TransferAttempt, next: TransferState) {
        attempt.advance(next);
        self.publish(attempt);
    }

    fn publish(&self, attempt: &TransferAttempt) {
        self.state_tx.send_replace(attempt.state().clone());
    }
}
