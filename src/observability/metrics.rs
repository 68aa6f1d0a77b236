//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_auth_decisions_total` (counter): allow/deny/error/unvalidated
//! - `gateway_authorizer_cache_total` (counter): hit/miss
//! - `gateway_invocations_total` (counter): ok/error

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(err) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(error = %err, "failed to install metrics exporter");
    } else {
        tracing::info!(address = %addr, "metrics exporter listening");
    }
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an authorization outcome (allow, deny, error, unvalidated).
pub fn record_auth_decision(outcome: &str) {
    counter!("gateway_auth_decisions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a decision cache lookup.
pub fn record_authorizer_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("gateway_authorizer_cache_total", "result" => result).increment(1);
}

/// Record a target-function invocation outcome.
pub fn record_invocation(outcome: &str) {
    counter!("gateway_invocations_total", "outcome" => outcome.to_string()).increment(1);
}
