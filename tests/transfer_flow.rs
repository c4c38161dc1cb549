//! Transfer executor behavior against a scripted wallet.

mod common;

use alloy::primitives::{TxKind, U256};
use alloy::sol_types::SolCall;
use std::sync::Arc;
use std::time::Duration;

use common::{
    fast_config, registry, start_session, Calls, MockWallet, ReceiptMode, BASE_SEPOLIA_CHAIN_ID,
    MOCK_ACCOUNT, SEPOLIA_CHAIN_ID,
};
use evm_bridge_console::error::{BridgeError, TransferFailure};
use evm_bridge_console::network::NetworkName;
use evm_bridge_console::session::ProviderSession;
use evm_bridge_console::transfer::token::IERC20;
use evm_bridge_console::transfer::{TransferExecutor, TransferSettings, TransferState};
use evm_bridge_console::wallet::WalletError;

fn executor(session: Arc<ProviderSession>) -> TransferExecutor {
    let settings = TransferSettings::from_config(&fast_config().transfer).unwrap();
    TransferExecutor::new(session, registry(), settings)
}

#[tokio::test]
async fn test_no_signer_makes_no_calls() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    MockWallet::set(&wallet.reject_accounts, true);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;
    let executor = executor(session);
    let state = executor.subscribe();

    let err = executor.send_fixed_transfer().await.unwrap_err();
    assert!(matches!(err, BridgeError::NoSigner));
    assert_eq!(err.user_message(), "Please connect to the wallet first.");
    assert_eq!(wallet.calls.chain_calls(), 0);
    assert!(matches!(*state.borrow(), TransferState::Failed { .. }));
}

#[tokio::test]
async fn test_read_only_session_has_no_signer() {
    let session = start_session(None, NetworkName::Sepolia).await;
    let err = executor(session).send_fixed_transfer().await.unwrap_err();
    assert!(matches!(err, BridgeError::NoSigner));
}

#[tokio::test]
async fn test_matching_chain_skips_switch() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;
    let executor = executor(session);
    let state = executor.subscribe();

    let result = executor.send_fixed_transfer().await.unwrap();
    assert_eq!(result.network, NetworkName::Sepolia);
    assert_eq!(result.amount, U256::from(123_000u64));
    assert_eq!(result.block_number, Some(7));

    assert_eq!(Calls::get(&wallet.calls.add_chain), 0);
    assert_eq!(Calls::get(&wallet.calls.send), 1);

    let sent = wallet.sent();
    let tx = &sent[0];
    let sepolia = registry();
    let token = sepolia.config(NetworkName::Sepolia).unwrap().token_contract_address;
    assert_eq!(tx.to, Some(TxKind::Call(token)));
    assert_eq!(tx.from, Some(MOCK_ACCOUNT));

    let call = IERC20::transferCall::abi_decode(tx.input.input().unwrap()).unwrap();
    assert_eq!(call.amount, U256::from(123_000u64));
    assert_eq!(
        call.to,
        fast_config().transfer.recipient.parse::<alloy::primitives::Address>().unwrap()
    );

    assert_eq!(
        *state.borrow(),
        TransferState::Succeeded {
            tx_hash: result.transaction_hash
        }
    );
}

#[tokio::test]
async fn test_mismatched_chain_switches_once() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    let session = start_session(Some(&wallet), NetworkName::BaseSepolia).await;

    executor(session).send_fixed_transfer().await.unwrap();

    let added = wallet.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].chain_id, "0x14A34");
    assert_eq!(added[0].chain_name, "Base Sepolia");
    assert_eq!(added[0].native_currency.symbol, "ETH");
    assert_eq!(added[0].native_currency.decimals, 18);
    assert_eq!(wallet.active_chain(), BASE_SEPOLIA_CHAIN_ID);

    let base_token = registry()
        .config(NetworkName::BaseSepolia)
        .unwrap()
        .token_contract_address;
    assert_eq!(wallet.sent()[0].to, Some(TxKind::Call(base_token)));
}

#[tokio::test]
async fn test_rejected_switch_aborts_transfer() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    MockWallet::set(&wallet.reject_chain, true);
    let session = start_session(Some(&wallet), NetworkName::BaseSepolia).await;

    let err = executor(session).send_fixed_transfer().await.unwrap_err();
    assert!(matches!(err, BridgeError::ChainSwitchRejected(_)));
    assert!(err.is_retryable());
    assert_eq!(Calls::get(&wallet.calls.add_chain), 1);
    assert_eq!(Calls::get(&wallet.calls.send), 0);
    assert_eq!(wallet.active_chain(), SEPOLIA_CHAIN_ID);
}

#[tokio::test]
async fn test_wallet_rejects_transaction() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    MockWallet::set(&wallet.reject_send, true);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;

    let err = executor(session).send_fixed_transfer().await.unwrap_err();
    assert!(matches!(
        err,
        BridgeError::TransferFailed {
            cause: TransferFailure::Wallet(WalletError::UserRejected)
        }
    ));
    assert_eq!(Calls::get(&wallet.calls.receipt), 0);
}

#[tokio::test]
async fn test_reverted_transaction() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    wallet.set_receipt_mode(ReceiptMode::Reverted);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;

    let err = executor(session).send_fixed_transfer().await.unwrap_err();
    assert!(matches!(
        err,
        BridgeError::TransferFailed {
            cause: TransferFailure::Reverted(_)
        }
    ));
}

#[tokio::test]
async fn test_unconfirmed_transaction_times_out() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    wallet.set_receipt_mode(ReceiptMode::Never);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;
    let executor = executor(session);
    let state = executor.subscribe();

    let err = executor.send_fixed_transfer().await.unwrap_err();
    assert!(matches!(
        err,
        BridgeError::TransferFailed {
            cause: TransferFailure::ConfirmationTimeout { secs: 1, .. }
        }
    ));
    assert!(Calls::get(&wallet.calls.receipt) > 1);
    assert!(matches!(*state.borrow(), TransferState::Failed { .. }));
}

#[tokio::test]
async fn test_new_transfer_uses_current_network() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;
    let executor = executor(session.clone());

    let first = executor.send_fixed_transfer().await.unwrap();
    assert_eq!(first.network, NetworkName::Sepolia);

    session
        .on_source_network_changed(NetworkName::BaseSepolia)
        .await
        .unwrap();
    let second = executor.send_fixed_transfer().await.unwrap();
    assert_eq!(second.network, NetworkName::BaseSepolia);
    assert_eq!(wallet.active_chain(), BASE_SEPOLIA_CHAIN_ID);
    assert_ne!(first.transaction_hash, second.transaction_hash);
}

#[tokio::test]
async fn test_pending_transfer_confirms_on_submitting_chain() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    wallet.withhold_receipts(Some(SEPOLIA_CHAIN_ID));
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;

    let mut config = fast_config();
    config.transfer.confirmation_timeout_secs = 10;
    let settings = TransferSettings::from_config(&config.transfer).unwrap();
    let executor = Arc::new(TransferExecutor::new(session.clone(), registry(), settings));
    let mut state = executor.subscribe();

    let first = tokio::spawn({
        let executor = executor.clone();
        async move { executor.send_fixed_transfer().await }
    });
    state
        .wait_for(|s| matches!(s, TransferState::Confirming { .. }))
        .await
        .unwrap();

    // The wallet moves to Base while the Sepolia transfer is still pending.
    session
        .on_source_network_changed(NetworkName::BaseSepolia)
        .await
        .unwrap();
    let second = executor.send_fixed_transfer().await.unwrap();
    assert_eq!(second.network, NetworkName::BaseSepolia);
    assert_eq!(wallet.active_chain(), BASE_SEPOLIA_CHAIN_ID);

    wallet.withhold_receipts(None);
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.network, NetworkName::Sepolia);
    assert_ne!(first.transaction_hash, second.transaction_hash);
}

#[tokio::test]
async fn test_transfer_waits_for_reinitialization() {
    let wallet = MockWallet::new(SEPOLIA_CHAIN_ID);
    let session = start_session(Some(&wallet), NetworkName::Sepolia).await;
    let before = session.current().await.unwrap();
    let executor = Arc::new(executor(session.clone()));

    wallet.hold_accounts.arm();
    let reinit = tokio::spawn({
        let session = session.clone();
        async move {
            session
                .on_source_network_changed(NetworkName::BaseSepolia)
                .await
        }
    });
    wallet.hold_accounts.entered().await;

    let transfer = tokio::spawn({
        let executor = executor.clone();
        async move { executor.send_fixed_transfer().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!transfer.is_finished());
    assert_eq!(Calls::get(&wallet.calls.send), 0);

    wallet.hold_accounts.release();
    assert!(reinit.await.unwrap().unwrap());
    let result = transfer.await.unwrap().unwrap();

    let after = session.current().await.unwrap();
    assert_eq!(after.generation, before.generation + 1);
    assert_eq!(result.network, NetworkName::BaseSepolia);
    assert_eq!(wallet.active_chain(), BASE_SEPOLIA_CHAIN_ID);

    let base_token = registry()
        .config(NetworkName::BaseSepolia)
        .unwrap()
        .token_contract_address;
    assert_eq!(wallet.sent()[0].to, Some(TxKind::Call(base_token)));
}
