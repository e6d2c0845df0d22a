//! GitHub OAuth flow
//!
//! Implements the browser-facing half of the authorization code flow.
//! The resulting GitHub profile is returned to the caller and not stored.

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;

use crate::AppState;
use crate::api::QueryParams;
use crate::error::AppError;
use crate::templates::LoginPage;

/// Create authentication router
///
/// Routes (nested under `/auth`):
/// - GET /login - Login page
/// - GET /login/github - Redirect to GitHub
/// - GET /github/callback - OAuth callback
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/login/github", get(github_redirect))
        .route("/github/callback", get(github_callback))
}

// =============================================================================
// Login Page
// =============================================================================

/// GET /auth/login
async fn login_page(State(state): State<AppState>) -> Html<String> {
    Html(
        LoginPage {
            app_name: &state.config.server.name,
            github_login_path: "/auth/login/github",
        }
        .render(),
    )
}

// =============================================================================
// GitHub OAuth
// =============================================================================

/// GET /auth/login/github
///
/// 301 to GitHub's authorize page with client_id and scope.
async fn github_redirect(State(state): State<AppState>) -> impl IntoResponse {
    let location = state.github.authorize_url();
    tracing::debug!(%location, "Redirecting to GitHub");

    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
}

/// Query parameters from GitHub callback
#[derive(Debug, Deserialize)]
struct GitHubCallbackQuery {
    /// Authorization code
    code: Option<String>,
}

/// GET /auth/github/callback
///
/// # Steps
/// 1. Reject a missing code before any outbound call
/// 2. Exchange code for access token
/// 3. Fetch profile and emails
/// 4. Return both as pretty-printed JSON
async fn github_callback(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GitHubCallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing code".to_string()))?;

    let token = state.github.exchange_code_for_token(&code).await?;

    let (profile, emails) = tokio::try_join!(
        state.github.fetch_profile(&token),
        state.github.fetch_emails(&token),
    )?;

    if profile.trim().is_empty() {
        return Err(AppError::Unauthorized);
    }

    let body = format_github_data(&profile, &emails)?;
    tracing::info!("GitHub sign-in completed");

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

// =============================================================================
// Helpers
// =============================================================================

/// Combine the raw profile and emails bodies into one indented document.
fn format_github_data(profile: &str, emails: &str) -> Result<String, AppError> {
    let parse = |what: &str, raw: &str| {
        serde_json::from_str::<serde_json::Value>(raw)
            .map_err(|e| AppError::GitHub(format!("GitHub {what} response is not JSON: {e}")))
    };

    let document = serde_json::json!({
        "profile": parse("profile", profile)?,
        "emails": parse("emails", emails)?,
    });

    serde_json::to_string_pretty(&document).map_err(|e| AppError::Internal(e.into()))
}
