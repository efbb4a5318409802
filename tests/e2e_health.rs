//! E2E tests for health check and basic server functionality

mod common;

use common::{MockGitHub, ProfileReply, TestServer, TokenReply};

async fn server() -> (MockGitHub, TestServer) {
    let github = MockGitHub::start(
        TokenReply::Token("tok_1"),
        ProfileReply::Json(r#"{"login":"octocat"}"#),
    )
    .await;
    let server = TestServer::new(&github).await;
    (github, server)
}

#[tokio::test]
async fn test_health_check() {
    let (_github, server) = server().await;

    let response = server.get("/health").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_home_page_renders() {
    let (_github, server) = server().await;

    let response = server.get("/").await;

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Login with GitHub"));
}

#[tokio::test]
async fn test_404_for_unknown_routes() {
    let (_github, server) = server().await;

    let response = server.get("/unknown/route").await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_metrics_endpoint_is_served() {
    let (_github, server) = server().await;

    let response = server.get("/metrics").await;

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
}
