//! GitHub OAuth endpoints
//!
//! Builds authorization URLs and exchanges authorization codes for
//! access tokens against GitHub (or anything speaking its token API).

use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use url::Url;

use crate::config::GitHubOAuthConfig;
use crate::error::AppError;

/// OAuth provider built once from configuration
#[derive(Clone)]
pub struct GitHubOAuth {
    client_id: String,
    client_secret: String,
    callback_url: Url,
    authorize_url: Url,
    token_url: Url,
    user_url: Url,
    scopes: Vec<String>,
    /// Client used for the token exchange (redirects disabled)
    http: Client,
}

/// GitHub token endpoint response
///
/// GitHub answers a bad code with `200 OK` and an `error` field, so
/// every field is optional here.
#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl GitHubOAuth {
    /// Create the provider from validated configuration
    ///
    /// # Errors
    /// Returns `Config` if any endpoint is not a valid URL.
    pub fn new(config: &GitHubOAuthConfig, http: Client) -> Result<Self, AppError> {
        let parse = |key: &str, value: &str| {
            Url::parse(value)
                .map_err(|e| AppError::Config(format!("{key} is not a valid URL: {e}")))
        };

        let user_url = format!("{}/user", config.api_base_url.trim_end_matches('/'));

        Ok(Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            callback_url: parse("github.callback_url", &config.callback_url)?,
            authorize_url: parse("github.authorize_url", &config.authorize_url)?,
            token_url: parse("github.token_url", &config.token_url)?,
            user_url: parse("github.api_base_url", &user_url)?,
            scopes: config.scopes.clone(),
            http,
        })
    }

    /// Authorization page URL carrying `state`
    ///
    /// Deterministic: the same state always yields the same URL.
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", self.callback_url.as_str());
            if !self.scopes.is_empty() {
                query.append_pair("scope", &self.scopes.join(" "));
            }
            query.append_pair("state", state);
        }
        url
    }

    /// "Current user" REST endpoint
    pub fn user_url(&self) -> &Url {
        &self.user_url
    }

    /// Exchange an authorization code for an access token
    ///
    /// # Errors
    /// Returns `TokenExchange` on transport failure, non-success status,
    /// a provider `error` field, or a response without `access_token`.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.callback_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::TokenExchange(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: GitHubTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("invalid token response: {e}")))?;

        if let Some(error) = token.error {
            let description = token.error_description.unwrap_or_default();
            return Err(AppError::TokenExchange(format!("{error}: {description}")));
        }

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::TokenExchange("response has no access_token".to_string()))
    }
}
