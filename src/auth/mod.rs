//! Authentication
//!
//! Handles:
//! - GitHub OAuth flow and client
//! - Caller identity (trusted header by default)

pub mod github;
mod middleware;
mod oauth;

pub use github::{AccessToken, GitHubClient};
pub use middleware::{
    CurrentUser, IdentityVerifier, SharedVerifier, TrustedHeaderVerifier, UserId,
    require_identity,
};
pub use oauth::auth_router;
