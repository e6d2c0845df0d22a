//! E2E tests for liveness and basic server functionality

mod common;

use common::TestServer;

#[tokio::test]
async fn test_liveness() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/test"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(body, "Snippetier is up");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/test"))
        .send()
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cors_headers() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/test"))
        .header("Origin", "https://frontend.example.com")
        .send()
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_404_for_unknown_routes() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/unknown/route"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_metrics_exposes_request_counters() {
    let server = TestServer::new().await;

    // Generate at least one tracked request first
    server
        .client
        .get(server.url("/api/test"))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("snippetier_http_requests_total"));
    assert!(body.contains(r#"endpoint="/api/test""#));
}
