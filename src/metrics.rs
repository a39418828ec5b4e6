//! Prometheus metrics
//!
//! Observability for the profile cache and upstream calls, served on `/metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};

lazy_static! {
    /// Counter: profile cache operations (hit/miss/fallback)
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec!(
        "portfolio_cache_operations_total",
        "Profile cache operations by type",
        &["operation"]
    )
    .expect("Failed to create cache_operations metric");

    /// Counter: upstream errors by endpoint and error kind
    pub static ref UPSTREAM_ERRORS: CounterVec = register_counter_vec!(
        "portfolio_upstream_errors_total",
        "Total upstream GitHub errors",
        &["endpoint", "kind"]
    )
    .expect("Failed to create upstream_errors metric");

    /// Counter: contribution lookups that fell back to zero
    pub static ref CONTRIBUTION_FALLBACKS: Counter = register_counter!(
        "portfolio_contribution_fallbacks_total",
        "Contribution count lookups that failed and defaulted to 0"
    )
    .expect("Failed to create contribution_fallbacks metric");

    /// Histogram: full aggregation duration (seconds)
    pub static ref AGGREGATION_DURATION: Histogram = register_histogram!(
        "portfolio_aggregation_duration_seconds",
        "Duration of profile aggregations that reached upstream",
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create aggregation_duration metric");
}

/// Record cache hit
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

/// Record cache miss
pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

/// Record a cached value served because aggregation failed
pub fn record_cache_fallback() {
    CACHE_OPERATIONS.with_label_values(&["fallback"]).inc();
}

/// Increment upstream error counter
pub fn record_upstream_error(endpoint: &str, kind: &str) {
    UPSTREAM_ERRORS.with_label_values(&[endpoint, kind]).inc();
}

pub fn record_contribution_fallback() {
    CONTRIBUTION_FALLBACKS.inc();
}

pub fn record_aggregation_duration(duration_secs: f64) {
    AGGREGATION_DURATION.observe(duration_secs);
}

/// Encode all metrics as Prometheus text format
pub fn encode_metrics() -> crate::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| crate::PortfolioError::Other(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| crate::PortfolioError::Other(format!("Metrics are not UTF-8: {}", e)))
}
