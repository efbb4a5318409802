//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Form, Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use ghlogin::{AppState, config};
use tokio::net::TcpListener;

/// How the mock token endpoint answers
#[derive(Clone)]
pub enum TokenReply {
    /// `200 {"access_token": …}`
    Token(&'static str),
    /// Arbitrary status with an error body
    Status(StatusCode),
    /// GitHub-style `200` with an `error` field
    GitHubError,
}

/// How the mock profile endpoint answers
#[derive(Clone)]
pub enum ProfileReply {
    /// `200` with the given JSON body
    Json(&'static str),
    /// Accept the connection and drop it without answering
    CloseConnection,
}

/// In-process stand-in for github.com and api.github.com
pub struct MockGitHub {
    pub addr: String,
    /// Base URL for the profile API (may differ from `addr`)
    pub api_base_url: String,
    pub token_calls: Arc<AtomicUsize>,
    pub token_forms: Arc<Mutex<Vec<Vec<(String, String)>>>>,
    pub user_calls: Arc<AtomicUsize>,
    pub user_authorizations: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockGitHub {
    pub async fn start(token: TokenReply, profile: ProfileReply) -> Self {
        let token_calls = Arc::new(AtomicUsize::new(0));
        let token_forms: Arc<Mutex<Vec<Vec<(String, String)>>>> = Arc::default();
        let user_calls = Arc::new(AtomicUsize::new(0));
        let user_authorizations: Arc<Mutex<Vec<Option<String>>>> = Arc::default();

        let token_handler = {
            let calls = token_calls.clone();
            let forms = token_forms.clone();
            move |Form(form): Form<Vec<(String, String)>>| {
                let calls = calls.clone();
                let forms = forms.clone();
                let token = token.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    forms.lock().unwrap().push(form);
                    match token {
                        TokenReply::Token(access_token) => Json(serde_json::json!({
                            "access_token": access_token,
                        }))
                        .into_response(),
                        TokenReply::Status(status) => (
                            status,
                            Json(serde_json::json!({ "error": "bad_request" })),
                        )
                            .into_response(),
                        TokenReply::GitHubError => Json(serde_json::json!({
                            "error": "bad_verification_code",
                            "error_description": "The code passed is incorrect or expired.",
                        }))
                        .into_response(),
                    }
                }
            }
        };

        let user_handler = {
            let calls = user_calls.clone();
            let authorizations = user_authorizations.clone();
            let body = match &profile {
                ProfileReply::Json(body) => *body,
                ProfileReply::CloseConnection => "",
            };
            move |headers: HeaderMap| {
                let calls = calls.clone();
                let authorizations = authorizations.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    authorizations.lock().unwrap().push(
                        headers
                            .get(AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(ToString::to_string),
                    );
                    let response: Response = (
                        [("content-type", "application/json")],
                        body,
                    )
                        .into_response();
                    response
                }
            }
        };

        let app = Router::new()
            .route("/login/oauth/access_token", post(token_handler))
            .route("/user", get(user_handler));

        let addr = spawn(app).await;

        let api_base_url = match profile {
            ProfileReply::Json(_) => addr.clone(),
            ProfileReply::CloseConnection => spawn_hangup().await,
        };

        Self {
            addr,
            api_base_url,
            token_calls,
            token_forms,
            user_calls,
            user_authorizations,
        }
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Listener that accepts connections and immediately closes them
async fn spawn_hangup() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    format!("http://{}", addr)
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Start the app against a mock GitHub with default settings
    pub async fn new(github: &MockGitHub) -> Self {
        Self::with_overrides(github, &[]).await
    }

    /// Start the app with extra config overrides
    pub async fn with_overrides(github: &MockGitHub, overrides: &[(&str, &str)]) -> Self {
        ghlogin::metrics::init_metrics();

        let mut builder = config::AppConfig::defaults()
            .unwrap()
            .set_override("server.host", "127.0.0.1")
            .unwrap()
            .set_override("github.client_id", "test-client-id")
            .unwrap()
            .set_override("github.client_secret", "test-client-secret")
            .unwrap()
            .set_override(
                "github.authorize_url",
                format!("{}/login/oauth/authorize", github.addr),
            )
            .unwrap()
            .set_override(
                "github.token_url",
                format!("{}/login/oauth/access_token", github.addr),
            )
            .unwrap()
            .set_override("github.api_base_url", github.api_base_url.clone())
            .unwrap()
            .set_override("upstream.timeout_seconds", 5)
            .unwrap();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }

        let config = config::AppConfig::from_builder(builder).unwrap();
        let state = AppState::new(config).unwrap();

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        let addr = spawn(ghlogin::build_router(state.clone())).await;

        Self {
            addr,
            state,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// GET a path without following redirects
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request succeeds")
    }
}

/// Location header of a redirect response
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}
