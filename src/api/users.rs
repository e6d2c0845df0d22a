//! User endpoints

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
use crate::data::{User, UserFields};
use crate::error::AppError;

/// Create users router
///
/// Routes (nested under `/api/users`):
/// - POST /new - Create a user
/// - GET /me - The user named by the caller identity
/// - GET /:id - Fetch a user
/// - PUT /:id - Replace a user's fields
/// - DELETE /:id - Delete a user
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/new", post(create_user))
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

async fn fetch_user(state: &AppState, id: i64) -> Result<User, AppError> {
    state
        .db
        .users()
        .get_by_id(id)
        .await
        .and_then(|user| user.ok_or(AppError::NotFound))
        .map_err(storage_failure("Failed to retrieve user"))
}

/// POST /api/users/new
async fn create_user(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<UserFields>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state
        .db
        .users()
        .create(&fields)
        .await
        .map_err(storage_failure("Failed to create user"))?;

    tracing::info!(user_id = user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/me
async fn get_current_user(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<User>, AppError> {
    Ok(Json(fetch_user(&state, user_id.0).await?))
}

/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, "user")?;
    Ok(Json(fetch_user(&state, id).await?))
}

/// PUT /api/users/:id
///
/// Every field is replaced; omitted fields become empty.
async fn update_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    JsonBody(fields): JsonBody<UserFields>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, "user")?;

    let user = state
        .db
        .users()
        .update(id, &fields)
        .await
        .map_err(storage_failure("Failed to update user"))?;

    Ok(Json(user))
}

/// DELETE /api/users/:id
async fn delete_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "user")?;

    state
        .db
        .users()
        .delete(id)
        .await
        .map_err(storage_failure("Failed to delete user"))?;

    Ok(StatusCode::NO_CONTENT)
}
