//! Token-authenticated HTTP client
//!
//! Every request sent through [`AuthenticatedClient`] carries
//! `Authorization: token <api token>`.

use reqwest::{
    Body, Client, IntoUrl, Method, Request, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};

use crate::error::AppError;

/// HTTP client bound to a single API token
///
/// The token is fixed at construction. No retries; transport errors
/// are returned to the caller as-is.
#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Client,
    authorization: HeaderValue,
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("authorization", &"token [redacted]")
            .finish()
    }
}

impl AuthenticatedClient {
    /// Wrap `inner` so that all requests authenticate with `api_token`
    ///
    /// # Errors
    /// Returns `TokenExchange` if the token cannot be used as a header value.
    pub fn new(inner: Client, api_token: &str) -> Result<Self, AppError> {
        let mut authorization = HeaderValue::from_str(&format!("token {api_token}"))
            .map_err(|_| {
                AppError::TokenExchange("access token is not a valid header value".to_string())
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            inner,
            authorization,
        })
    }

    /// Issue a GET request
    pub async fn get(&self, url: impl IntoUrl) -> Result<Response, AppError> {
        let request = self.inner.request(Method::GET, url).build()?;
        self.execute(request).await
    }

    /// Issue a POST request with the given content type and body
    pub async fn post(
        &self,
        url: impl IntoUrl,
        content_type: &str,
        body: impl Into<Body>,
    ) -> Result<Response, AppError> {
        let request = self
            .inner
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .build()?;
        self.execute(request).await
    }

    /// Attach the authorization header and dispatch
    pub async fn execute(&self, mut request: Request) -> Result<Response, AppError> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.authorization.clone());
        Ok(self.inner.execute(request).await?)
    }
}
