//! Users repository

use sqlx::AnyPool;

use super::database::{inserted_id, timed};
use super::models::{User, UserFields};
use crate::error::AppError;

const SELECT_USER_BY_ID: &str = r#"
    SELECT id, username, email, full_name,
           CAST(created_at AS CHAR) AS created_at,
           CAST(updated_at AS CHAR) AS updated_at
    FROM users
    WHERE id = ?
"#;

/// CRUD over the `users` table
#[derive(Clone)]
pub struct UsersRepo {
    pool: AnyPool,
}

impl UsersRepo {
    pub(crate) fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Insert a user and return the stored row, timestamps included.
    pub async fn create(&self, fields: &UserFields) -> Result<User, AppError> {
        let result = timed(
            "insert",
            "users",
            sqlx::query("INSERT INTO users (username, email, full_name) VALUES (?, ?, ?)")
                .bind(fields.username.as_str())
                .bind(fields.email.as_str())
                .bind(fields.full_name.as_str())
                .execute(&self.pool),
        )
        .await?;

        let id = inserted_id(&result, "users")?;

        tracing::debug!(user_id = id, "User created");

        self.get_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        timed(
            "select",
            "users",
            sqlx::query_as::<_, User>(SELECT_USER_BY_ID)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Overwrite every writable field of a user.
    ///
    /// # Errors
    /// `AppError::NotFound` if no user has this id
    pub async fn update(&self, id: i64, fields: &UserFields) -> Result<User, AppError> {
        timed(
            "update",
            "users",
            sqlx::query(
                r#"
                UPDATE users
                SET username = ?, email = ?, full_name = ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                "#,
            )
            .bind(fields.username.as_str())
            .bind(fields.email.as_str())
            .bind(fields.full_name.as_str())
            .bind(id)
            .execute(&self.pool),
        )
        .await?;

        self.get_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Delete user by ID
    ///
    /// # Returns
    /// `true` if a row was removed; a missing id is not an error
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = timed(
            "delete",
            "users",
            sqlx::query("DELETE FROM users WHERE id = ?")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
