//! Identity middleware
//!
//! Resolves the caller's user id for routes that act on behalf of a user.
//!
//! The default verifier trusts the `sn-trusted-user-id` header verbatim:
//! whatever sits in front of this service is expected to have authenticated
//! the caller already. No signature or session is checked. Swap the verifier
//! on `AppState` to change that without touching handlers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderName, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;

/// Caller identity resolved by an [`IdentityVerifier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Decides who is making a request
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    /// # Errors
    /// - `AppError::Unauthorized` when no identity is asserted
    /// - `AppError::Validation` when the assertion is malformed
    fn verify_identity(&self, parts: &Parts) -> Result<UserId, AppError>;
}

/// Shared verifier handle stored in application state
pub type SharedVerifier = Arc<dyn IdentityVerifier>;

/// Accepts the user id from a request header without verification
#[derive(Debug, Clone)]
pub struct TrustedHeaderVerifier {
    header: HeaderName,
}

impl TrustedHeaderVerifier {
    pub const DEFAULT_HEADER: &'static str = "sn-trusted-user-id";

    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// Build from a configured header name
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid trusted header {name:?}: {e}")))?;
        Ok(Self::new(header))
    }
}

impl Default for TrustedHeaderVerifier {
    fn default() -> Self {
        Self::new(HeaderName::from_static(Self::DEFAULT_HEADER))
    }
}

impl IdentityVerifier for TrustedHeaderVerifier {
    fn verify_identity(&self, parts: &Parts) -> Result<UserId, AppError> {
        let raw = parts
            .headers
            .get(&self.header)
            .ok_or(AppError::Unauthorized)?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(UserId)
            .ok_or_else(|| AppError::Validation("Invalid user ID".to_string()))
    }
}

/// Middleware to require an identity
///
/// Resolves the caller and stores the `UserId` in request extensions.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/...", ...)
///     .route_layer(middleware::from_fn_with_state(state, require_identity));
/// ```
pub async fn require_identity(
    State(verifier): State<SharedVerifier>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let user_id = verifier.verify_identity(&parts)?;
    parts.extensions.insert(user_id);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Extractor for the current caller
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentUser(user_id): CurrentUser) -> impl IntoResponse {
///     format!("Hello, user {}", user_id.0)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    SharedVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user_id) = parts.extensions.get::<UserId>().copied() {
            return Ok(CurrentUser(user_id));
        }

        let verifier = SharedVerifier::from_ref(state);
        let user_id = verifier.verify_identity(parts)?;
        parts.extensions.insert(user_id);

        Ok(CurrentUser(user_id))
    }
}
