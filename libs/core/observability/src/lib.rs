//! Prometheus metrics for the event service.
//!
//! - a process-wide recorder installed by [`init_metrics`]
//! - `GET /metrics` rendering via [`metrics_handler`]
//! - per-request HTTP metrics via [`middleware::metrics_middleware`]
//! - event operation counters via [`EventMetrics`]
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, EventMetrics, EventOperation};
//!
//! init_metrics()?;
//! EventMetrics::record_operation(EventOperation::Create);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod events;
pub mod middleware;

pub use events::{EventMetrics, EventOperation, EventTimer};
pub use middleware::metrics_middleware;

pub use metrics::{counter, gauge, histogram};
pub use metrics_exporter_prometheus::BuildError;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder on first call.
///
/// Later calls return the same handle.
///
/// # Errors
/// Fails when another global recorder is already installed.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// `GET /metrics` in Prometheus text format.
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP requests answered with 4xx or 5xx"
    );

    describe_counter!(
        "events_operations_total",
        "Event operations completed, by operation"
    );
    describe_counter!(
        "events_operation_failures_total",
        "Event operations that failed, by operation and reason"
    );
    describe_histogram!(
        "events_operation_duration_seconds",
        "Event operation duration in seconds"
    );
}
