//! Snippetier binary entry point

use snippetier::{AppState, config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point
///
/// # Setup
/// 1. Load `.env` and initialize tracing/logging
/// 2. Load configuration from file and environment
/// 3. Initialize AppState (database, seed scripts, GitHub client)
/// 4. Build Axum router
/// 5. Serve until Ctrl-C, then close the database
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment and logging
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let log_format =
        std::env::var("SNIPPETIER__LOGGING__FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let log_level =
        std::env::var("SNIPPETIER__LOGGING__LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("snippetier={log_level},tower_http=debug").into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(dotenv_loaded, "Starting Snippetier...");

    snippetier::metrics::init_metrics();

    // 2. Configuration
    let config = config::AppConfig::load()?;
    tracing::info!(
        backend = ?config.database_backend(),
        reset_on_start = config.database.reset_on_start,
        seed_scripts = config.database.seed_scripts.len(),
        "Configuration loaded"
    );

    // 3. Application state
    let state = AppState::new(config.clone()).await?;

    // 4. Router
    let app = snippetier::build_router(state.clone());

    // 5. Serve
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
