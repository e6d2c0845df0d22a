//! Snippet endpoints

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};

use super::dto::{JsonBody, PathParam, parse_id, storage_failure};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{Snippet, SnippetFields};
use crate::error::AppError;

/// Create snippets router
///
/// Routes (nested under `/api/snippets`):
/// - GET / - List all snippets
/// - POST /new - Create a snippet owned by the caller
/// - GET /:id - Fetch one snippet
/// - PUT /:id - Update a snippet the caller owns
/// - DELETE /:id - Delete a snippet
pub fn snippets_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_snippets))
        .route("/new", post(create_snippet))
        .route(
            "/:id",
            get(get_snippet).put(update_snippet).delete(delete_snippet),
        )
}

/// GET /api/snippets
async fn list_snippets(State(state): State<AppState>) -> Result<Json<Vec<Snippet>>, AppError> {
    let snippets = state
        .db
        .snippets()
        .get_all()
        .await
        .map_err(storage_failure("Failed to retrieve snippets"))?;

    Ok(Json(snippets))
}

/// POST /api/snippets/new
///
/// Owner comes from the caller identity, never from the body.
async fn create_snippet(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    JsonBody(fields): JsonBody<SnippetFields>,
) -> Result<(StatusCode, Json<Snippet>), AppError> {
    let snippet = state
        .db
        .snippets()
        .create(user_id.0, &fields)
        .await
        .map_err(storage_failure("Failed to save snippet"))?;

    tracing::info!(snippet_id = snippet.id, user_id = user_id.0, "Snippet saved");

    Ok((StatusCode::CREATED, Json(snippet)))
}

/// GET /api/snippets/:id
async fn get_snippet(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Snippet>, AppError> {
    let id = parse_id(&id, "snippet")?;

    let snippet = state
        .db
        .snippets()
        .get_by_id(id)
        .await
        .and_then(|snippet| snippet.ok_or(AppError::NotFound))
        .map_err(storage_failure("Failed to retrieve snippet"))?;

    Ok(Json(snippet))
}

/// PUT /api/snippets/:id
///
/// Only rewrites the snippet when the caller owns it.
async fn update_snippet(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParam(id): PathParam<String>,
    JsonBody(fields): JsonBody<SnippetFields>,
) -> Result<Json<Snippet>, AppError> {
    let id = parse_id(&id, "snippet")?;

    let snippet = state
        .db
        .snippets()
        .update(user_id.0, id, &fields)
        .await
        .map_err(storage_failure("Failed to update snippet"))?;

    Ok(Json(snippet))
}

/// DELETE /api/snippets/:id
///
/// Not owner-scoped; any caller may delete any snippet.
async fn delete_snippet(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "snippet")?;

    let removed = state
        .db
        .snippets()
        .delete(id)
        .await
        .map_err(storage_failure("Failed to delete snippet"))?;

    if removed {
        tracing::info!(snippet_id = id, "Snippet deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
