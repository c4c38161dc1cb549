//! EVM bridge console library.
//!
//! Chain-session and transfer orchestration for a two-network USDC bridge:
//! provider/signer lifecycle, wallet chain negotiation, and the fixed
//! transfer submission/confirmation sequence.

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod network;
pub mod observability;
pub mod session;
pub mod transfer;
pub mod wallet;

pub use app::{ActionOutcome, BridgeApp, ChainStatus};
pub use config::schema::BridgeConfig;
pub use error::{BridgeError, BridgeResult, TransferFailure};
