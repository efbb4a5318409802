//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::Once;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Login flow metrics
    pub static ref LOGIN_REDIRECTS_TOTAL: IntCounter = IntCounter::new(
        "ghlogin_login_redirects_total",
        "Total number of redirects to the GitHub authorization page"
    ).expect("metric can be created");
    pub static ref CALLBACK_OUTCOMES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("ghlogin_callback_outcomes_total", "Total number of OAuth callbacks by terminal state"),
        &["outcome"]
    ).expect("metric can be created");

    // Upstream metrics
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ghlogin_upstream_request_duration_seconds",
            "GitHub request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("ghlogin_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() {
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    REGISTRY
        .register(Box::new(LOGIN_REDIRECTS_TOTAL.clone()))
        .expect("LOGIN_REDIRECTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(CALLBACK_OUTCOMES_TOTAL.clone()))
        .expect("CALLBACK_OUTCOMES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()))
        .expect("UPSTREAM_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}
