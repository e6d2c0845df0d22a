//! Request decoding helpers shared by the API handlers

use axum::{
    async_trait,
    extract::{
        FromRequest, FromRequestParts, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor whose rejection is the API's 400 envelope
///
/// Wraps `axum::Json` so a malformed body, wrong content type or
/// mismatched field type all read `{"error": "Invalid request body"}`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                let rejection: JsonRejection = rejection;
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::Validation("Invalid request body".to_string()))
            }
        }
    }
}

/// Query string extractor with the API's 400 envelope
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => {
                let rejection: QueryRejection = rejection;
                tracing::debug!(error = %rejection.body_text(), "Rejected query string");
                Err(AppError::Validation("Invalid query string".to_string()))
            }
        }
    }
}

/// Path parameter extractor with the API's 400 envelope
#[derive(Debug, Clone)]
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(PathParam(value)),
            Err(rejection) => {
                let rejection: PathRejection = rejection;
                tracing::debug!(error = %rejection.body_text(), "Rejected path parameter");
                Err(AppError::Validation("Invalid path parameter".to_string()))
            }
        }
    }
}

/// Parse an integer identifier from a path segment.
///
/// `what` names the identifier in the error message, e.g. "snippet".
pub fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("Invalid {what} ID")))
}

/// Replace a storage error with a generic message after logging the cause.
pub fn storage_failure(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |error| {
        tracing::error!(%error, "{}", message);
        AppError::Storage(message.to_string())
    }
}
