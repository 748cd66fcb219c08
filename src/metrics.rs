//! Prometheus counters for the HTTP front
//!
//! Registered in the default registry and rendered by `GET /metrics`.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    /// Gateway calls by operation (`catalog`/`token`) and outcome (`ok` or an error kind)
    pub static ref GATEWAY_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "gateway_requests_total",
        "Gateway calls by operation and outcome",
        &["operation", "outcome"]
    )
    .unwrap();

    pub static ref CATALOG_DROPPED_ENTRIES: IntCounter = register_int_counter!(
        "catalog_dropped_entries_total",
        "Upstream catalog entries rejected while decoding"
    )
    .unwrap();
}

pub fn record_outcome(operation: &str, outcome: &str) {
    GATEWAY_REQUESTS
        .with_label_values(&[operation, outcome])
        .inc();
}
