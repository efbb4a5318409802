//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (GHLOGIN__*)
//! 4. The plain `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET` and
//!    `CALLBACK_URL` variables (override)

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub github: GitHubOAuthConfig,
    pub auth: AuthConfig,
    pub render: RenderConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 3000)
    pub port: u16,
    /// Directory served on `/` instead of the built-in home page
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Socket address to listen on
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// GitHub OAuth configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URL registered with the GitHub OAuth app
    pub callback_url: String,
    pub authorize_url: String,
    pub token_url: String,
    /// REST API root; the profile is fetched from `<api_base_url>/user`
    pub api_base_url: String,
    /// Requested scopes (empty means GitHub's public-only default)
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Login flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// CSRF state token embedded in every authorization URL
    ///
    /// Constant for the process lifetime; not bound to any session.
    pub state: String,
}

/// Profile rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub format: crate::render::RenderFormat,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpstreamConfig {
    /// Request timeout for token exchange and profile fetch.
    ///
    /// Unset means the client default (no timeout).
    pub timeout_seconds: Option<u64>,
}

impl AppConfig {
    /// Builder pre-populated with default values
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, crate::error::AppError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("github.callback_url", "http://localhost:3000/callback")?
            .set_default(
                "github.authorize_url",
                "https://github.com/login/oauth/authorize",
            )?
            .set_default(
                "github.token_url",
                "https://github.com/login/oauth/access_token",
            )?
            .set_default("github.api_base_url", "https://api.github.com")?
            .set_default("auth.state", "random")?
            .set_default("render.format", "html")?)
    }

    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (GHLOGIN__*)
    /// 5. GITHUB_CLIENT_ID / GITHUB_CLIENT_SECRET / CALLBACK_URL
    ///
    /// # Errors
    /// Returns error if configuration is missing or invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("GHLOGIN")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in [
            ("GITHUB_CLIENT_ID", "github.client_id"),
            ("GITHUB_CLIENT_SECRET", "github.client_secret"),
            ("CALLBACK_URL", "github.callback_url"),
        ] {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        Self::from_builder(builder)
    }

    /// Deserialize and validate a prepared builder
    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<Self, crate::error::AppError> {
        let app_config: Self = builder
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        for (key, value) in [
            ("github.client_id", &self.github.client_id),
            ("github.client_secret", &self.github.client_secret),
            ("auth.state", &self.auth.state),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{key} must not be empty")));
            }
        }

        for (key, value) in [
            ("github.callback_url", &self.github.callback_url),
            ("github.authorize_url", &self.github.authorize_url),
            ("github.token_url", &self.github.token_url),
            ("github.api_base_url", &self.github.api_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::Config(format!("{key} is not a valid URL: {e}")))?;
        }

        if let Some(dir) = &self.server.static_dir {
            if !dir.is_dir() {
                return Err(AppError::Config(format!(
                    "server.static_dir {} is not a directory",
                    dir.display()
                )));
            }
        }

        if self.auth.state == "random" {
            tracing::warn!(
                "Using the built-in constant CSRF state token; set auth.state for anything beyond local testing"
            );
        }

        Ok(())
    }
}
