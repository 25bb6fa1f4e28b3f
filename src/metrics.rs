//! Prometheus metrics for oracle traffic and slip activity.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Oracle requests counter metric name.
pub const METRIC_ORACLE_REQUESTS: &str = "oracle_requests_total";
/// Oracle fallback substitutions counter metric name.
pub const METRIC_ORACLE_FALLBACKS: &str = "oracle_fallbacks_total";
/// Oracle fetch latency metric name.
pub const METRIC_ORACLE_FETCH_LATENCY: &str = "oracle_fetch_latency_ms";
/// Goals detected counter metric name.
pub const METRIC_GOALS_DETECTED: &str = "goals_detected_total";
/// Slips loaded counter metric name.
pub const METRIC_SLIPS_LOADED: &str = "slips_loaded_total";

/// Install the Prometheus recorder and return its render handle.
pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_ORACLE_REQUESTS, "Total number of oracle queries issued");
    describe_counter!(
        METRIC_ORACLE_FALLBACKS,
        "Total number of oracle failures degraded to fallback snapshots"
    );
    describe_histogram!(
        METRIC_ORACLE_FETCH_LATENCY,
        "Oracle snapshot fetch latency in milliseconds"
    );
    describe_counter!(METRIC_GOALS_DETECTED, "Total number of goals detected on refresh");
    describe_counter!(METRIC_SLIPS_LOADED, "Total number of slips submitted");

    debug!("Metrics initialized");
}

/// Record oracle fetch latency.
pub fn record_oracle_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_ORACLE_FETCH_LATENCY).record(latency_ms);
}

/// Increment oracle requests counter.
pub fn inc_oracle_requests() {
    counter!(METRIC_ORACLE_REQUESTS).increment(1);
}

/// Increment oracle fallback counter.
pub fn inc_oracle_fallbacks() {
    counter!(METRIC_ORACLE_FALLBACKS).increment(1);
}

/// Increment goals detected counter.
pub fn inc_goals_detected() {
    counter!(METRIC_GOALS_DETECTED).increment(1);
}

/// Increment slips loaded counter.
pub fn inc_slips_loaded() {
    counter!(METRIC_SLIPS_LOADED).increment(1);
}
