use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process. Safe to call from
/// every `Application::build`; later calls reuse the first handle.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder")
    });
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a checkout initiation attempt and its outcome.
pub fn record_checkout(outcome: &'static str) {
    metrics::counter!("pulaflow_checkouts_total", "outcome" => outcome).increment(1);
}

/// Count a received gateway webhook and how it was resolved.
pub fn record_webhook(result: &'static str) {
    metrics::counter!("pulaflow_webhooks_total", "result" => result).increment(1);
}
