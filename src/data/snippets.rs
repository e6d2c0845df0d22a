//! Snippets repository

use sqlx::AnyPool;

use super::database::{inserted_id, timed};
use super::models::{Snippet, SnippetFields};
use crate::error::AppError;

const SELECT_ALL_SNIPPETS: &str = r#"
    SELECT id, name, description, content, user_id,
           CAST(created_at AS CHAR) AS created_at,
           CAST(updated_at AS CHAR) AS updated_at
    FROM snippets
    ORDER BY id
"#;

const SELECT_SNIPPET_BY_ID: &str = r#"
    SELECT id, name, description, content, user_id,
           CAST(created_at AS CHAR) AS created_at,
           CAST(updated_at AS CHAR) AS updated_at
    FROM snippets
    WHERE id = ?
"#;

/// CRUD over the `snippets` table
#[derive(Clone)]
pub struct SnippetsRepo {
    pool: AnyPool,
}

impl SnippetsRepo {
    pub(crate) fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Get every snippet, oldest first
    pub async fn get_all(&self) -> Result<Vec<Snippet>, AppError> {
        timed(
            "select",
            "snippets",
            sqlx::query_as::<_, Snippet>(SELECT_ALL_SNIPPETS).fetch_all(&self.pool),
        )
        .await
    }

    /// Get snippet by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Snippet>, AppError> {
        timed(
            "select",
            "snippets",
            sqlx::query_as::<_, Snippet>(SELECT_SNIPPET_BY_ID)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Insert a snippet owned by `user_id` and return the stored row.
    pub async fn create(&self, user_id: i64, fields: &SnippetFields) -> Result<Snippet, AppError> {
        let result = timed(
            "insert",
            "snippets",
            sqlx::query(
                "INSERT INTO snippets (name, description, content, user_id) VALUES (?, ?, ?, ?)",
            )
            .bind(fields.name.as_str())
            .bind(fields.description.as_str())
            .bind(fields.content.as_str())
            .bind(user_id)
            .execute(&self.pool),
        )
        .await?;

        let id = inserted_id(&result, "snippets")?;

        tracing::debug!(user_id, snippet_id = id, "Snippet created");

        self.get_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Overwrite name, description and content of a snippet owned by `user_id`.
    ///
    /// The statement is scoped to `(id, user_id)`: a snippet owned by
    /// someone else is left untouched.
    ///
    /// # Errors
    /// `AppError::NotFound` if no snippet with this id belongs to `user_id`
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        fields: &SnippetFields,
    ) -> Result<Snippet, AppError> {
        let result = timed(
            "update",
            "snippets",
            sqlx::query(
                r#"
                UPDATE snippets
                SET name = ?, description = ?, content = ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ? AND user_id = ?
                "#,
            )
            .bind(fields.name.as_str())
            .bind(fields.description.as_str())
            .bind(fields.content.as_str())
            .bind(id)
            .bind(user_id)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(user_id, snippet_id = id, "Snippet update matched no owned row");
        }

        // MySQL reports zero affected rows when nothing changed, so ownership
        // is confirmed on the re-read rather than from the row count.
        match self.get_by_id(id).await? {
            Some(snippet) if snippet.user_id == user_id => Ok(snippet),
            _ => Err(AppError::NotFound),
        }
    }

    /// Delete snippet by ID, regardless of owner
    ///
    /// # Returns
    /// `true` if a row was removed; a missing id is not an error
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = timed(
            "delete",
            "snippets",
            sqlx::query("DELETE FROM snippets WHERE id = ?")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
