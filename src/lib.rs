//! Snippetier - store and retrieve code snippets per user
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - /api snippets and users (JSON)                           │
//! │  - /auth GitHub sign-in                                     │
//! │  - /metrics                                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │        Data Layer            │       GitHub OAuth client     │
//! │  - SQLite / MySQL (sqlx)     │  - token exchange             │
//! │  - users, snippets repos     │  - profile / emails           │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for snippets, users and metrics
//! - `auth`: GitHub OAuth flow and caller identity
//! - `data`: Database connection and repositories
//! - `templates`: HTML pages
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod templates;

use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across all handlers
///
/// Built once at startup and cloned (cheaply) into each request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database handle; the only way to persistent state
    pub db: Arc<data::Database>,

    /// Outbound GitHub OAuth/REST client
    pub github: Arc<auth::GitHubClient>,

    /// Resolves the caller's user id
    pub identity: auth::SharedVerifier,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to the database (resetting the file if configured)
    /// 2. Run seed scripts in order
    /// 3. Build the GitHub client
    /// 4. Install the trusted-header identity verifier
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to database
        let db = data::Database::connect(&config.database).await?;

        // 2. Seed
        for script in &config.database.seed_scripts {
            db.seed(script).await?;
        }

        // 3. HTTP client for GitHub (GitHub rejects requests without a User-Agent)
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("Snippetier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;
        let github = auth::GitHubClient::new(http_client, config.github.clone());

        // 4. Identity
        let identity = auth::TrustedHeaderVerifier::from_name(&config.auth.trusted_header)?;
        tracing::info!(
            header = %config.auth.trusted_header,
            "Caller identity is taken from a trusted header without verification"
        );

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            github: Arc::new(github),
            identity: Arc::new(identity),
        })
    }

    /// Replace the identity verifier.
    pub fn with_identity_verifier(mut self, verifier: auth::SharedVerifier) -> Self {
        self.identity = verifier;
        self
    }
}

impl FromRef<AppState> for auth::SharedVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::{Router, middleware};
    use tower::ServiceBuilder;
    use tower_http::{
        catch_panic::CatchPanicLayer,
        compression::CompressionLayer,
        cors::CorsLayer,
        limit::RequestBodyLimitLayer,
        request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
        trace::TraceLayer,
    };

    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .nest("/api", api::api_router())
        .nest("/auth", auth::auth_router())
        .route_layer(middleware::from_fn(api::track_http_metrics))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(api::metrics_router())
}
