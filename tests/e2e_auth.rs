//! E2E tests for the GitHub sign-in flow

mod common;

use common::{GOOD_CODE, TestServer};

#[tokio::test]
async fn test_login_page_links_to_github() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/login"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = response.text().await.unwrap();
    assert!(body.contains("/auth/login/github"));
    assert!(body.contains("Login with Github"));
    assert!(body.contains("Snippetier Test"));
}

#[tokio::test]
async fn test_github_redirect() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/login/github"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 301);
    let location = response.headers()["location"].to_str().unwrap();
    assert_eq!(
        location,
        format!(
            "{}/login/oauth/authorize?client_id=test-client-id&scope=user:email",
            server.github.base_url
        )
    );
    assert_eq!(server.github.calls(), 0);
}

#[tokio::test]
async fn test_callback_without_code_makes_no_outbound_call() {
    let server = TestServer::new().await;

    for path in ["/auth/github/callback", "/auth/github/callback?code="] {
        let response = server.client.get(server.url(path)).send().await.unwrap();

        assert_eq!(response.status(), 400, "{path}");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing code");
    }

    assert_eq!(server.github.calls(), 0);
}

#[tokio::test]
async fn test_callback_returns_profile_and_emails() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url(&format!("/auth/github/callback?code={GOOD_CODE}")))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    // Indented output
    assert!(body.contains("\n  "));

    let data: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(data["profile"]["login"], "octocat");
    assert_eq!(data["emails"][0]["email"], "octocat@github.com");

    // Token exchange, profile and emails
    assert_eq!(server.github.calls(), 3);
}

#[tokio::test]
async fn test_callback_with_rejected_code() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/github/callback?code=expired"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    // Only the token exchange was attempted
    assert_eq!(server.github.calls(), 1);
}

#[tokio::test]
async fn test_server_keeps_serving_after_failed_callback() {
    let server = TestServer::new().await;

    server
        .client
        .get(server.url("/auth/github/callback?code=expired"))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(server.url("/api/test"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_callback_with_duplicated_code_is_json_error() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/github/callback?code=a&code=b"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "Invalid query string"}));
    assert_eq!(server.github.calls(), 0);
}
