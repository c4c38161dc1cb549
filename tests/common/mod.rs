//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::{address, Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use evm_bridge_console::config::BridgeConfig;
use evm_bridge_console::history::{HistoryError, HistoryRecord, HistorySource};
use evm_bridge_console::network::{NetworkName, NetworkRegistry};
use evm_bridge_console::session::ProviderSession;
use evm_bridge_console::wallet::{
    AddChainParams, TxConfirmation, WalletError, WalletExtension, WalletResult,
};

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84_532;
pub const MOCK_ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// How the mock answers receipt queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptMode {
    Success,
    Reverted,
    Never,
}

/// Per-method call counters.
#[derive(Debug, Default)]
pub struct Calls {
    pub request_accounts: AtomicUsize,
    pub accounts: AtomicUsize,
    pub chain_id: AtomicUsize,
    pub add_chain: AtomicUsize,
    pub send: AtomicUsize,
    pub receipt: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Calls that reach the chain or change wallet state.
    pub fn chain_calls(&self) -> usize {
        Self::get(&self.chain_id)
            + Self::get(&self.add_chain)
            + Self::get(&self.send)
            + Self::get(&self.receipt)
    }
}

/// Parks the first call after `arm` until `release`.
#[derive(Debug, Default)]
pub struct Hold {
    armed: AtomicBool,
    entered: Notify,
    released: Notify,
}

impl Hold {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Resolves once a call is parked.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.released.notified().await;
        }
    }
}

/// Scriptable in-memory wallet extension.
///
/// Receipts are only visible on the chain a transaction was sent on.
pub struct MockWallet {
    pub address: Address,
    active_chain: AtomicU64,
    authorized: AtomicBool,
    pub reject_accounts: AtomicBool,
    pub reject_chain: AtomicBool,
    pub reject_send: AtomicBool,
    receipt_mode: Mutex<ReceiptMode>,
    withheld_chain: Mutex<Option<u64>>,
    submitted_on: Mutex<HashMap<TxHash, u64>>,
    pub hold_accounts: Hold,
    pub hold_request_accounts: Hold,
    pub calls: Calls,
    pub sent: Mutex<Vec<TransactionRequest>>,
    pub added: Mutex<Vec<AddChainParams>>,
}

impl MockWallet {
    pub fn new(active_chain: u64) -> Arc<Self> {
        Arc::new(Self {
            address: MOCK_ACCOUNT,
            active_chain: AtomicU64::new(active_chain),
            authorized: AtomicBool::new(false),
            reject_accounts: AtomicBool::new(false),
            reject_chain: AtomicBool::new(false),
            reject_send: AtomicBool::new(false),
            receipt_mode: Mutex::new(ReceiptMode::Success),
            withheld_chain: Mutex::new(None),
            submitted_on: Mutex::new(HashMap::new()),
            hold_accounts: Hold::default(),
            hold_request_accounts: Hold::default(),
            calls: Calls::default(),
            sent: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
        })
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    pub fn set_receipt_mode(&self, mode: ReceiptMode) {
        *self.receipt_mode.lock().unwrap() = mode;
    }

    /// Drop account authorization, as if the user disconnected the site.
    pub fn revoke(&self) {
        self.authorized.store(false, Ordering::SeqCst);
    }

    /// Keep receipts on `chain_id` pending until cleared with `None`.
    pub fn withhold_receipts(&self, chain_id: Option<u64>) {
        *self.withheld_chain.lock().unwrap() = chain_id;
    }

    pub fn active_chain(&self) -> u64 {
        self.active_chain.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn added(&self) -> Vec<AddChainParams> {
        self.added.lock().unwrap().clone()
    }

    pub fn as_extension(self: &Arc<Self>) -> Arc<dyn WalletExtension> {
        self.clone()
    }
}

#[async_trait]
impl WalletExtension for MockWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.calls.request_accounts.fetch_add(1, Ordering::SeqCst);
        self.hold_request_accounts.pass().await;
        if self.reject_accounts.load(Ordering::SeqCst) {
            return Err(WalletError::UserRejected);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(vec![self.address])
    }

    async fn accounts(&self) -> WalletResult<Vec<Address>> {
        self.calls.accounts.fetch_add(1, Ordering::SeqCst);
        self.hold_accounts.pass().await;
        if self.authorized.load(Ordering::SeqCst) {
            Ok(vec![self.address])
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> WalletResult<u64> {
        self.calls.chain_id.fetch_add(1, Ordering::SeqCst);
        Ok(self.active_chain())
    }

    async fn add_ethereum_chain(&self, params: &AddChainParams) -> WalletResult<()> {
        self.calls.add_chain.fetch_add(1, Ordering::SeqCst);
        if self.reject_chain.load(Ordering::SeqCst) {
            return Err(WalletError::UserRejected);
        }
        let chain_id = params
            .chain_id
            .strip_prefix("0x")
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .ok_or_else(|| WalletError::InvalidRequest(params.chain_id.clone()))?;
        self.added.lock().unwrap().push(params.clone());
        self.active_chain.store(chain_id, Ordering::SeqCst);
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash> {
        let n = self.calls.send.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(WalletError::Unauthorized);
        }
        if self.reject_send.load(Ordering::SeqCst) {
            return Err(WalletError::UserRejected);
        }
        self.sent.lock().unwrap().push(tx);
        let tx_hash = TxHash::with_last_byte(n as u8);
        self.submitted_on
            .lock()
            .unwrap()
            .insert(tx_hash, self.active_chain());
        Ok(tx_hash)
    }

    async fn block_number(&self) -> WalletResult<u64> {
        Ok(42)
    }

    async fn transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> WalletResult<Option<TxConfirmation>> {
        self.calls.receipt.fetch_add(1, Ordering::SeqCst);
        let submitted_on = self.submitted_on.lock().unwrap().get(&tx_hash).copied();
        if submitted_on != Some(chain_id) || *self.withheld_chain.lock().unwrap() == Some(chain_id) {
            return Ok(None);
        }
        let mode = *self.receipt_mode.lock().unwrap();
        Ok(match mode {
            ReceiptMode::Never => None,
            ReceiptMode::Success | ReceiptMode::Reverted => Some(TxConfirmation {
                transaction_hash: tx_hash,
                block_number: Some(7),
                success: mode == ReceiptMode::Success,
            }),
        })
    }
}

/// History source returning fixed records, or failing.
pub struct StaticHistory(pub Option<Vec<&'static str>>);

#[async_trait]
impl HistorySource for StaticHistory {
    async fn fetch(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        match &self.0 {
            Some(records) => Ok(records
                .iter()
                .map(|r| HistoryRecord(r.to_string()))
                .collect()),
            None => Err(HistoryError::Status(503)),
        }
    }
}

/// Default config with short confirmation waits.
pub fn fast_config() -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.transfer.confirmation_timeout_secs = 1;
    config.transfer.receipt_poll_interval_ms = 10;
    config.wallet.rpc_timeout_secs = 2;
    config
}

pub fn registry() -> Arc<NetworkRegistry> {
    Arc::new(NetworkRegistry::from_config(&BridgeConfig::default()).unwrap())
}

/// Session initialized on `source`, backed by `wallet` when given.
pub async fn start_session(
    wallet: Option<&Arc<MockWallet>>,
    source: NetworkName,
) -> Arc<ProviderSession> {
    let session = Arc::new(ProviderSession::new(
        registry(),
        wallet.map(|w| w.as_extension()),
        Duration::from_secs(2),
    ));
    session.initialize(source).await.unwrap();
    session
}
