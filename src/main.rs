mod api;
mod config;
mod models;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::models::EntityKind;
use crate::storage::{FileStorage, Storage};
use axum::{ServiceExt, extract::Request};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Place Reviews API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Storage: {}", config.storage.file_path.display());
    info!("   - API prefix: {:?}", config.server.api_prefix);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Initialize storage
    info!("💾 Loading storage...");
    let storage = Arc::new(FileStorage::open(&config.storage.file_path)?);
    info!(
        "✅ Storage ready ({} places, {} users, {} reviews)",
        storage.count(Some(EntityKind::Place))?,
        storage.count(Some(EntityKind::User))?,
        storage.count(Some(EntityKind::Review))?,
    );

    // Create application state
    let state = AppState {
        storage: storage.clone(),
    };

    let app = api::app(state, &config.server.api_prefix);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let prefix = config.server.api_prefix.trim_end_matches('/');
    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /health                                  - Health check");
    info!("   GET    {}/places/{{place_id}}/reviews         - List reviews of a place", prefix);
    info!("   POST   {}/places/{{place_id}}/reviews         - Add review", prefix);
    info!("   GET    {}/reviews/{{review_id}}               - Get review", prefix);
    info!("   PUT    {}/reviews/{{review_id}}               - Update review text", prefix);
    info!("   DELETE {}/reviews/{{review_id}}               - Delete review", prefix);
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush storage on graceful shutdown
    info!("💾 Saving storage before shutdown...");
    match storage.save() {
        Ok(()) => info!("✅ Storage saved successfully"),
        Err(e) => error!("⚠️  Failed to save storage: {}", e),
    }

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
