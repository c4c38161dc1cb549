//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_session_init_total` (counter): session initializations by network, mode
//! - `bridge_chain_switch_total` (counter): wallet chain checks by result
//! - `bridge_transfers_total` (counter): transfer attempts by outcome
//! - `bridge_history_records` (gauge): records in the last history fetch
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::network::NetworkName;
use crate::session::ProviderMode;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_session_init(network: NetworkName, mode: ProviderMode) {
    metrics::counter!(
        "bridge_session_init_total",
        "network" => network.as_str(),
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// `result` is one of `already_active`, `switched`, `rejected`.
pub fn record_chain_switch(network: NetworkName, result: &'static str) {
    metrics::counter!(
        "bridge_chain_switch_total",
        "network" => network.as_str(),
        "result" => result
    )
    .increment(1);
}

pub fn record_transfer(network: NetworkName, outcome: &'static str) {
    metrics::counter!(
        "bridge_transfers_total",
        "network" => network.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_history_size(records: usize) {
    metrics::gauge!("bridge_history_records").set(records as f64);
}
