//! Data models
//!
//! Rust structs representing database rows and the field sets
//! accepted when writing them. Ids are store-generated integers and
//! timestamps are the store's own text representation.

use serde::{Deserialize, Serialize};

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable user fields
///
/// Omitted JSON fields decode as empty strings; updates overwrite every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserFields {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

// =============================================================================
// Snippet
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub content: String,
    /// Owning user
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable snippet fields
///
/// The owner never comes from the body; it is the caller's verified identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SnippetFields {
    pub name: String,
    pub description: String,
    pub content: String,
}
