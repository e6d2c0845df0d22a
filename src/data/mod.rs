//! Data layer module
//!
//! Handles all data persistence:
//! - Connection lifecycle and seed scripts (`Database`)
//! - Users repository
//! - Snippets repository

mod database;
mod models;
mod snippets;
mod users;

pub use database::Database;
pub use models::*;
pub use snippets::SnippetsRepo;
pub use users::UsersRepo;
