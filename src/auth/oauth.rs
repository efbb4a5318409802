//! GitHub OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with GitHub.

use axum::{
    Router,
    extract::{Query, State},
    http::header::ACCEPT,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use super::{AuthenticatedClient, Profile};
use crate::AppState;
use crate::error::AppError;
use crate::metrics::{
    CALLBACK_OUTCOMES_TOTAL, LOGIN_REDIRECTS_TOTAL, UPSTREAM_REQUEST_DURATION_SECONDS,
};

/// Create authentication router
///
/// Routes:
/// - GET /auth - Redirect to GitHub
/// - GET /callback - OAuth callback
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth", get(github_redirect))
        .route("/callback", get(github_callback))
}

// =============================================================================
// Home Page
// =============================================================================

/// GET /
///
/// Renders a simple home page with a GitHub sign-in link.
pub async fn home_page() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>ghlogin</title></head>
<body>
    <h1>Hello!</h1>
    <p>Please sign in with GitHub</p>
    <a href="/auth">Login with GitHub</a>
</body>
</html>
"#,
    )
}

// =============================================================================
// GitHub OAuth
// =============================================================================

/// GET /auth
///
/// Redirects the browser to the GitHub authorization page with
/// client_id, redirect_uri, scope and the CSRF state token.
async fn github_redirect(State(state): State<AppState>) -> Redirect {
    let url = state.github.authorize_url(&state.config.auth.state);
    tracing::info!(url = %url, "Redirecting to GitHub authorization page");
    LOGIN_REDIRECTS_TOTAL.inc();
    Redirect::temporary(url.as_str())
}

/// Query parameters from GitHub callback
///
/// Missing parameters read as empty strings. When a key repeats, the
/// first occurrence wins.
#[derive(Debug, Default)]
struct GitHubCallbackQuery {
    /// Authorization code
    code: String,
    /// CSRF state token
    state: String,
}

impl GitHubCallbackQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut code = None;
        let mut state = None;
        for (key, value) in pairs {
            match key.as_str() {
                "code" if code.is_none() => code = Some(value),
                "state" if state.is_none() => state = Some(value),
                _ => {}
            }
        }

        Self {
            code: code.unwrap_or_default(),
            state: state.unwrap_or_default(),
        }
    }
}

/// GET /callback
///
/// Handles OAuth callback from GitHub. Any failure redirects to `/`.
async fn github_callback(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let query = GitHubCallbackQuery::from_pairs(pairs);
    let result = complete_login(&state, &query)
        .await
        .and_then(|profile| state.render.render(&profile));

    let outcome = match &result {
        Ok(_) => "success",
        Err(error) => error.outcome(),
    };
    CALLBACK_OUTCOMES_TOTAL.with_label_values(&[outcome]).inc();

    result
}

/// Run the callback sequence up to a fetched profile
///
/// # Steps
/// 1. Verify CSRF state
/// 2. Exchange code for access token
/// 3. Fetch user info from GitHub with the token
/// 4. Read the full profile body
async fn complete_login(
    state: &AppState,
    query: &GitHubCallbackQuery,
) -> Result<Profile, AppError> {
    if query.state != state.config.auth.state {
        return Err(AppError::StateMismatch);
    }

    tracing::debug!(code = %query.code, "Exchanging authorization code");
    let access_token = {
        let _timer = UPSTREAM_REQUEST_DURATION_SECONDS
            .with_label_values(&["token"])
            .start_timer();
        state.github.exchange_code(&query.code).await?
    };
    tracing::info!("Access token obtained");

    let client = AuthenticatedClient::new((*state.http_client).clone(), &access_token)?;

    let _timer = UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&["user"])
        .start_timer();

    let request = state
        .http_client
        .get(state.github.user_url().clone())
        .header(ACCEPT, "application/vnd.github+json")
        .build()?;
    let response = client.execute(request).await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "GitHub user endpoint returned an error status");
    }

    let body = response.bytes().await.map_err(AppError::BodyRead)?;
    Ok(Profile::new(body))
}
