//! Prometheus metrics for the options engine.
//!
//! Recording functions go through the `metrics` facade and are no-ops until
//! a recorder is installed, so library code records unconditionally.
//!
//! # Example
//!
//! ```ignore
//! use options_engine::observability::init_metrics;
//!
//! let handle = init_metrics().expect("Failed to initialize metrics");
//! println!("{}", handle.render());
//! ```

use std::sync::OnceLock;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install the Prometheus recorder.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Install the Prometheus recorder once and return its handle.
///
/// Later calls return the same handle.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;
    register_metrics();
    tracing::info!("Prometheus metrics recorder installed");

    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// The installed handle, if `init_metrics` has run.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

fn register_metrics() {
    describe_counter!(
        "options_engine_gateway_requests_total",
        "Gateway lookups by operation and outcome (hit, miss, coalesced)"
    );
    describe_counter!(
        "options_engine_provider_errors_total",
        "Provider call failures by operation"
    );
    describe_counter!(
        "options_engine_condor_scans_total",
        "Iron condor scans completed"
    );
    describe_histogram!(
        "options_engine_condor_candidates",
        "Candidates returned per iron condor scan"
    );
}

// ============================================================================
// Gateway Metrics
// ============================================================================

/// Record a gateway lookup.
///
/// # Arguments
///
/// * `operation` - `quote`, `expirations`, or `chain`
/// * `outcome` - `hit`, `miss`, or `coalesced`
pub fn record_gateway_request(operation: &'static str, outcome: &'static str) {
    counter!(
        "options_engine_gateway_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a failed provider call.
pub fn record_provider_error(operation: &'static str) {
    counter!(
        "options_engine_provider_errors_total",
        "operation" => operation
    )
    .increment(1);
}

// ============================================================================
// Scanner Metrics
// ============================================================================

/// Record a completed condor scan and how many candidates it returned.
pub fn record_condor_scan(candidates: usize) {
    counter!("options_engine_condor_scans_total").increment(1);
    histogram!("options_engine_condor_candidates").record(candidates as f64);
}
