//! Operational HTTP endpoints
//!
//! The login flow itself lives in `crate::auth`; this module only
//! exposes health and metrics.

mod metrics;

pub use metrics::metrics_router;

use axum::{Router, routing::get};

/// Create health check router
///
/// Routes:
/// - GET /health - Liveness check
pub fn health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
