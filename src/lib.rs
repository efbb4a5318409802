//! ghlogin - a minimal "Login with GitHub" OAuth2 web server
//!
//! # Flow
//!
//! ```text
//! browser ──GET /auth──────────▶ 307 github.com/login/oauth/authorize?…&state=…
//!         ◀─consent─────────────
//! browser ──GET /callback?state&code──▶ verify state
//!                                      ├─ POST token endpoint (code → access token)
//!                                      ├─ GET api.github.com/user (Authorization: token …)
//!                                      └─ render profile (text | html | json)
//! ```
//!
//! Any failure inside `/callback` is logged and answered with a
//! redirect to `/`.
//!
//! # Modules
//!
//! - `auth`: OAuth redirect/callback handlers and the token-authenticated client
//! - `render`: Profile renderers
//! - `api`: Health and metrics endpoints
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod render;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// GitHub OAuth endpoints and credentials
    pub github: Arc<auth::GitHubOAuth>,

    /// HTTP client for GitHub API calls
    pub http_client: Arc<reqwest::Client>,

    /// Renderer for the callback result page
    pub render: render::RenderFormat,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Errors
    /// Returns error if an endpoint URL is invalid or an HTTP client
    /// cannot be built
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let http_client = http_client_builder(&config.upstream)
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        // No redirects on the token exchange client.
        let oauth_client = http_client_builder(&config.upstream)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        let github = auth::GitHubOAuth::new(&config.github, oauth_client)?;

        tracing::info!(
            client_id = %config.github.client_id,
            callback_url = %config.github.callback_url,
            render = ?config.render.format,
            "Application state initialized successfully"
        );

        Ok(Self {
            render: config.render.format,
            config: Arc::new(config),
            github: Arc::new(github),
            http_client: Arc::new(http_client),
        })
    }
}

fn http_client_builder(upstream: &config::UpstreamConfig) -> reqwest::ClientBuilder {
    let builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    match upstream.timeout_seconds {
        Some(secs) => builder.timeout(std::time::Duration::from_secs(secs)),
        None => builder,
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::{Router, routing::get};
    use tower_http::{services::ServeDir, trace::TraceLayer};

    let router = Router::new()
        .merge(api::health_router())
        .merge(auth::auth_router());

    let router = match &state.config.server.static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static files on /");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router.route("/", get(auth::home_page)),
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(api::metrics_router())
}
