//! Transfer orchestration.
//!
//! # Data Flow
//! ```text
//! send_fixed_transfer
//!     → signer precondition (session snapshot)
//!     → switcher.rs (wallet chain == source chain)
//!     → token.rs (ERC-20 transfer calldata, amount.rs scaling)
//!     → signer submit → receipt wait
//!     → TransferResult
//! ```

pub mod amount;
pub mod executor;
pub mod switcher;
pub mod token;
pub mod types;

pub use executor::TransferExecutor;
pub use switcher::{NetworkSwitcher, SwitchOutcome};
pub use types::{TransferAttempt, TransferResult, TransferSettings, TransferState};
