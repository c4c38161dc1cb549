//! Supported networks.
//!
//! `registry.rs` resolves names to [`NetworkConfig`] and defines the
//! source → destination counterpart mapping. The set of networks is closed.

pub mod registry;
pub mod types;

pub use registry::NetworkRegistry;
pub use types::{NetworkConfig, NetworkName};
