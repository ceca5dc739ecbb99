//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    // Page and redirect responses are fast; keep sub-millisecond resolution
    let buckets = [
        0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so the
/// exposition carries HELP/TYPE lines from startup.
pub fn describe_metrics() {
    describe_counter!(
        "barber_gate_http_requests_total",
        "Total number of HTTP requests by route area"
    );
    describe_histogram!(
        "barber_gate_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "barber_gate_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        "barber_gate_access_decisions_total",
        "Access decisions by outcome and matching rule"
    );

    gauge!("barber_gate_http_requests_in_flight").set(0.0);
    counter!("barber_gate_access_decisions_total", "outcome" => "redirect", "reason" => "login_required")
        .absolute(0);
    counter!("barber_gate_access_decisions_total", "outcome" => "redirect", "reason" => "permission_denied")
        .absolute(0);
}
