//! Database connection and lifecycle
//!
//! All database access goes through this module and the repositories
//! it hands out. The pool is opened through SQLx's `any` driver, so the
//! same statements run against SQLite and MySQL.

use sqlx::any::{AnyPoolOptions, AnyQueryResult, install_default_drivers};
use sqlx::AnyPool;
use std::future::Future;
use std::path::Path;
use std::time::Instant;

use super::snippets::SnippetsRepo;
use super::users::UsersRepo;
use crate::config::{DatabaseBackend, DatabaseConfig, sqlite_file_path};
use crate::error::AppError;

/// Database connection pool wrapper.
///
/// Owns the only handle to persistent state. Repositories are cheap
/// views over the same pool and share it without coordination.
pub struct Database {
    pool: AnyPool,
    backend: DatabaseBackend,
}

/// Delete the SQLite file (if any) and create an empty one in its place.
fn reset_database_file(path: &Path) -> Result<(), AppError> {
    let io_error = |e| AppError::Database(sqlx::Error::Io(e));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut sidecars = Vec::new();
    for suffix in ["-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        sidecars.push(std::path::PathBuf::from(name));
    }

    for file in std::iter::once(path.to_path_buf()).chain(sidecars) {
        match std::fs::remove_file(&file) {
            Ok(()) => tracing::warn!(path = %file.display(), "Removed existing database file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(e)),
        }
    }

    std::fs::File::create(path).map_err(io_error)?;
    tracing::info!(path = %path.display(), "Created empty database file");

    Ok(())
}

/// Run one statement and record its outcome in the query metrics.
pub(super) async fn timed<T, F>(
    operation: &'static str,
    table: &'static str,
    query: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let started = Instant::now();
    let result = query.await;
    crate::metrics::observe_db_query(operation, table, result.is_ok(), started.elapsed());
    result.map_err(AppError::from)
}

/// Id the database generated for an INSERT.
pub(super) fn inserted_id(result: &AnyQueryResult, table: &str) -> Result<i64, AppError> {
    result.last_insert_id().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "database did not report the id inserted into {table}"
        ))
    })
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to the configured database
    ///
    /// With `reset_on_start` the SQLite file is wiped and recreated first.
    /// Seed scripts are not run here; see [`Database::seed`].
    ///
    /// # Errors
    /// Returns error if the URL is unsupported or the connection fails
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let backend = DatabaseBackend::from_url(&config.url).ok_or_else(|| {
            AppError::Config(format!("unsupported database url: {}", config.url))
        })?;

        if config.reset_on_start {
            let path = sqlite_file_path(&config.url).ok_or_else(|| {
                AppError::Config(
                    "database.reset_on_start requires a file-backed sqlite: url".to_string(),
                )
            })?;
            tracing::warn!(
                path = %path.display(),
                "Resetting database file; all existing data is discarded"
            );
            reset_database_file(&path)?;
        }

        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        tracing::info!(?backend, "Database connected");

        Ok(Self { pool, backend })
    }

    /// Execute a SQL script verbatim.
    ///
    /// Statements run in order; a failure part-way leaves the earlier
    /// statements applied.
    pub async fn seed(&self, script_path: &Path) -> Result<(), AppError> {
        use anyhow::Context;

        let script = tokio::fs::read_to_string(script_path)
            .await
            .with_context(|| format!("failed to read seed script {}", script_path.display()))?;

        timed(
            "script",
            "*",
            sqlx::Executor::execute(&self.pool, script.as_str()),
        )
        .await?;

        tracing::info!(script = %script_path.display(), "Seed script applied");
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// Raw pool for test fixtures; application code goes through the repositories.
    #[doc(hidden)]
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn users(&self) -> UsersRepo {
        UsersRepo::new(self.pool.clone())
    }

    pub fn snippets(&self) -> SnippetsRepo {
        SnippetsRepo::new(self.pool.clone())
    }
}
