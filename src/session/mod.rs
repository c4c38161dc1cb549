//! Chain session subsystem.
//!
//! # Data Flow
//! ```text
//! source network selected
//!     → provider_session.rs (on_source_network_changed → initialize)
//!     → provider.rs (Interactive via wallet | ReadOnly via RPC)
//!     → Session snapshot (provider + optional signer), swapped atomically
//! ```

pub mod provider;
pub mod provider_session;

pub use provider::{ChainProvider, ProviderMode, ReadOnlyProvider};
pub use provider_session::{ProviderSession, Session};
