//! Error types for ghlogin
//!
//! All errors in the application are converted to `AppError`.
//! Request-scoped failures of the login flow collapse into a
//! temporary redirect to the home page; everything else becomes
//! a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error (fatal at startup, 500 if ever returned)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Callback `state` did not match the expected CSRF token
    #[error("State is not valid")]
    StateMismatch,

    /// Authorization code could not be exchanged for an access token
    #[error("Could not get token: {0}")]
    TokenExchange(String),

    /// Outbound request could not be built or sent
    #[error("Could not create request: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be read
    #[error("Could not read content: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// Profile payload is not valid JSON
    #[error("Could not decode profile: {0}")]
    ProfileDecode(#[from] serde_json::Error),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// Whether this error belongs to a single login attempt
    ///
    /// Request-scoped errors are never surfaced to the browser; they
    /// turn into a redirect to `/`.
    pub fn is_request_scoped(&self) -> bool {
        !matches!(self, AppError::Config(_) | AppError::Internal(_))
    }

    /// Terminal callback state this error corresponds to
    pub fn outcome(&self) -> &'static str {
        match self {
            AppError::StateMismatch => "state_invalid",
            AppError::TokenExchange(_) => "exchange_failed",
            AppError::Transport(_) => "fetch_failed",
            AppError::BodyRead(_) | AppError::ProfileDecode(_) => "read_failed",
            AppError::Config(_) | AppError::Internal(_) => "internal",
        }
    }

    /// Metric label for this error
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::StateMismatch => "state_mismatch",
            AppError::TokenExchange(_) => "token_exchange",
            AppError::Transport(_) => "transport",
            AppError::BodyRead(_) => "body_read",
            AppError::ProfileDecode(_) => "profile_decode",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Request-scoped errors are logged and answered with
    /// `307 Location: /`. Startup-class errors map to 500 with a
    /// JSON error body.
    fn into_response(self) -> Response {
        use crate::metrics::ERRORS_TOTAL;
        use axum::Json;

        ERRORS_TOTAL.with_label_values(&[self.error_type()]).inc();

        if self.is_request_scoped() {
            tracing::warn!(
                error = %self,
                error_type = self.error_type(),
                "Login flow aborted, redirecting home"
            );
            return Redirect::temporary("/").into_response();
        }

        tracing::error!(error = %self, "Request failed");

        let error_message = match &self {
            AppError::Config(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
