//! GitHub OAuth client
//!
//! Performs the outbound half of the sign-in flow:
//! 1. Exchange the authorization code for an access token
//! 2. Fetch the user's profile
//! 3. Fetch the user's email addresses
//!
//! Bodies are returned raw; nothing is persisted or validated here.
//! Failures surface as per-request errors, there is no retry.

use serde::Deserialize;
use std::fmt;

use crate::config::GitHubConfig;
use crate::error::AppError;

/// OAuth access token returned by GitHub
///
/// Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// GitHub token response
///
/// On a bad code GitHub still answers 200, with `error` set instead of
/// `access_token`.
#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    #[allow(dead_code)]
    token_type: Option<String>,
    #[allow(dead_code)]
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for GitHub's OAuth and REST endpoints
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, config: GitHubConfig) -> Self {
        Self { http, config }
    }

    /// Browser redirect target for the authorize step
    ///
    /// `<authorize_url>?client_id=<id>&scope=<scope>`
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&scope={}",
            self.config.authorize_url,
            urlencoding::encode(&self.config.client_id),
            self.config.scope
        )
    }

    /// Exchange an authorization code for an access token
    ///
    /// # Errors
    /// - `AppError::HttpClient` / `AppError::GitHub` if the call fails or the
    ///   body is not the expected JSON
    /// - `AppError::Unauthorized` if GitHub answered without a token
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<AccessToken, AppError> {
        let body = serde_json::json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "code": code,
        });

        let response = self
            .http
            .post(&self.config.token_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .inspect_err(|_| crate::metrics::observe_github_request("token", "error"))?;

        let status = response.status();
        let raw = response.text().await?;

        let parsed: GitHubTokenResponse = serde_json::from_str(&raw).map_err(|e| {
            crate::metrics::observe_github_request("token", "invalid");
            tracing::warn!(%status, error = %e, "Unparseable GitHub token response");
            AppError::GitHub(format!("Invalid token response from GitHub (HTTP {status})"))
        })?;

        match parsed.access_token.filter(|token| !token.is_empty()) {
            Some(token) => {
                crate::metrics::observe_github_request("token", "ok");
                Ok(AccessToken::new(token))
            }
            None => {
                crate::metrics::observe_github_request("token", "rejected");
                tracing::info!(
                    %status,
                    error = parsed.error.as_deref().unwrap_or("unknown"),
                    description = parsed.error_description.as_deref().unwrap_or(""),
                    "GitHub refused the authorization code"
                );
                Err(AppError::Unauthorized)
            }
        }
    }

    /// GET /user
    pub async fn fetch_profile(&self, token: &AccessToken) -> Result<String, AppError> {
        self.get_raw("/user", "profile", token).await
    }

    /// GET /user/emails
    pub async fn fetch_emails(&self, token: &AccessToken) -> Result<String, AppError> {
        self.get_raw("/user/emails", "emails", token).await
    }

    async fn get_raw(
        &self,
        path: &str,
        endpoint: &'static str,
        token: &AccessToken,
    ) -> Result<String, AppError> {
        let url = format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path);

        let response = self
            .http
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", token.secret()),
            )
            .send()
            .await
            .inspect_err(|_| crate::metrics::observe_github_request(endpoint, "error"))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            crate::metrics::observe_github_request(endpoint, "rejected");
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            crate::metrics::observe_github_request(endpoint, "error");
            return Err(AppError::GitHub(format!(
                "GitHub {endpoint} request failed: HTTP {status}"
            )));
        }

        crate::metrics::observe_github_request(endpoint, "ok");
        Ok(response.text().await?)
    }
}
