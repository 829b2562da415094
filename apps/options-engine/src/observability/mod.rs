//! Observability module for metrics.
//!
//! Logging setup lives in [`crate::telemetry`]; this module owns the
//! Prometheus recorder and the metric recording helpers.

mod metrics;

pub use metrics::{
    MetricsError, get_metrics_handle, init_metrics, record_condor_scan, record_gateway_request,
    record_provider_error,
};
