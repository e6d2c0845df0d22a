//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use snippetier::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Header the server reads the caller's user id from
pub const USER_HEADER: &str = "sn-trusted-user-id";

/// Authorization code the fake GitHub accepts
pub const GOOD_CODE: &str = "good-code";

const FAKE_TOKEN: &str = "gho_test_token";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub github: FakeGitHub,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        snippetier::metrics::init_metrics();

        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let github = FakeGitHub::start().await;

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                name: "Snippetier Test".to_string(),
                body_limit_bytes: 64 * 1024,
            },
            database: config::DatabaseConfig {
                url: format!("sqlite://{}?mode=rwc", db_path.display()),
                max_connections: 2,
                reset_on_start: false,
                seed_scripts: vec![schema_path()],
            },
            github: config::GitHubConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                authorize_url: format!("{}/login/oauth/authorize", github.base_url),
                token_url: format!("{}/login/oauth/access_token", github.base_url),
                api_base_url: github.base_url.clone(),
                scope: "user:email".to_string(),
            },
            auth: config::AuthConfig {
                trusted_header: USER_HEADER.to_string(),
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Redirects are asserted on, not followed
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = snippetier::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            github,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Insert a user with a fixed id, bypassing the API
    pub async fn insert_user_with_id(&self, id: i64, username: &str) {
        sqlx::query("INSERT INTO users (id, username, email, full_name) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(username)
            .bind(format!("{username}@example.com"))
            .bind(username)
            .execute(self.state.db.pool())
            .await
            .unwrap();
    }

    /// Create a snippet through the API as `user_id`
    pub async fn create_snippet(&self, user_id: i64, name: &str) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/api/snippets/new"))
            .header(USER_HEADER, user_id.to_string())
            .json(&serde_json::json!({
                "name": name,
                "description": format!("{name} description"),
                "content": "fn main() {}",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }
}

/// Absolute path of the SQLite schema script
pub fn schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("db/sql/init.sql")
}

/// A stand-in for github.com and api.github.com
///
/// Counts every request it receives so tests can assert that no outbound
/// call was made.
pub struct FakeGitHub {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
}

impl FakeGitHub {
    pub async fn start() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .route("/login/oauth/access_token", post(fake_token))
            .route("/user", get(fake_profile))
            .route("/user/emails", get(fake_emails))
            .with_state(calls.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            calls,
        }
    }

    /// Number of requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn fake_token(
    State(calls): State<Arc<AtomicUsize>>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    calls.fetch_add(1, Ordering::SeqCst);

    if body["code"] == GOOD_CODE && body["client_id"] == "test-client-id" {
        Json(serde_json::json!({
            "access_token": FAKE_TOKEN,
            "token_type": "bearer",
            "scope": "user:email",
        }))
    } else {
        // GitHub answers 200 with an error document for bad codes
        Json(serde_json::json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        }))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("token {FAKE_TOKEN}"))
}

async fn fake_profile(
    State(calls): State<Arc<AtomicUsize>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    calls.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"message": "Bad credentials"})));
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({"login": "octocat", "id": 1, "name": "The Octocat"})),
    )
}

async fn fake_emails(
    State(calls): State<Arc<AtomicUsize>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    calls.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"message": "Bad credentials"})));
    }

    (
        StatusCode::OK,
        Json(serde_json::json!([
            {"email": "octocat@github.com", "primary": true, "verified": true}
        ])),
    )
}
