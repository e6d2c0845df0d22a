//! API layer
//!
//! HTTP handlers for:
//! - Snippets and users (JSON over `/api`)
//! - Metrics (Prometheus)

mod dto;
pub mod metrics;
mod snippets;
mod users;

use axum::{Router, routing::get};

use crate::AppState;

pub use dto::{JsonBody, PathParam, QueryParams, parse_id};
pub use metrics::{metrics_router, track_http_metrics};
pub use snippets::snippets_router;
pub use users::users_router;

/// Create the JSON API router (nested under `/api`)
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/test", get(liveness))
        .nest("/snippets", snippets_router())
        .nest("/users", users_router())
}

/// GET /api/test
async fn liveness() -> &'static str {
    "Snippetier is up"
}
