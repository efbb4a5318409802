//! ghlogin binary entry point

use ghlogin::{AppState, config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point
///
/// # Setup
/// 1. Seed the environment from `.env`, if present
/// 2. Initialize tracing/logging
/// 3. Load configuration from file and environment
/// 4. Initialize AppState
/// 5. Build Axum router
/// 6. Start HTTP server
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Seed environment; a missing .env is fine
    let dotenv = dotenvy::dotenv();

    // 2. Initialize tracing/logging
    let log_format =
        std::env::var("GHLOGIN__LOGGING__FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ghlogin=info,tower_http=debug".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded environment file"),
        Err(error) if error.not_found() => tracing::debug!("No .env file found"),
        Err(error) => tracing::warn!(%error, "Failed to load .env file"),
    }

    tracing::info!("Starting ghlogin...");

    ghlogin::metrics::init_metrics();

    // 3. Load configuration
    let config = config::AppConfig::load().inspect_err(|error| {
        tracing::error!(%error, "Invalid configuration");
    })?;
    let addr = config.server.bind_addr();

    // 4. Initialize application state
    let state = AppState::new(config)?;

    // 5. Build Axum router
    let app = ghlogin::build_router(state);

    // 6. Start HTTP server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening for requests at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
