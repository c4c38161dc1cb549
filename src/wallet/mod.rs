//! Wallet extension integration.
//!
//! # Data Flow
//! ```text
//! Environment (private key variable)
//!     → local.rs (extension detection, prompts, signing)
//!     → signer.rs (account handle per session generation)
//!     → connector.rs (account authorization, connected address)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls made by the extension have timeouts

pub mod connector;
pub mod extension;
pub mod local;
pub mod signer;

pub use connector::WalletConnector;
pub use extension::{
    approve_all, AddChainParams, Approver, NativeCurrency, TxConfirmation, WalletError,
    WalletExtension, WalletPrompt, WalletResult,
};
pub use local::LocalWalletExtension;
pub use signer::WalletSigner;
