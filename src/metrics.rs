use axum::{http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Called once at startup, before any
/// counter is touched; later calls are no-ops.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Full(
                "stripe.webhook.processing_ms".to_string(),
            ),
            &[1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0],
        )
        .expect("failed to set buckets for stripe.webhook.processing_ms")
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let _ = METRICS_HANDLE.set(handle);
}

/// GET /metrics - Prometheus exposition
pub async fn metrics_handler() -> impl IntoResponse {
    match METRICS_HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}
