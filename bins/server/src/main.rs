//! Bucketfront API Server
//!
//! Main entry point: loads configuration, binds the bucket and serves the
//! resource API.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucketfront_api::{AppState, create_router};
use bucketfront_core::resource::ResourceService;
use bucketfront_core::storage::{OpendalStore, StorageProvider};
use bucketfront_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucketfront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Bind the bucket
    let provider = StorageProvider::from_settings(&config.storage);
    let store = OpendalStore::from_provider(&provider).context("Failed to initialize storage")?;
    info!(
        provider = store.provider_name(),
        bucket = %store.bucket(),
        region = %config.storage.region,
        "Storage configured"
    );

    // Create application state
    let service = ResourceService::new(Arc::new(store), config.listing.clone());
    let state = AppState::new(service);
    info!(
        page_size = config.listing.page_size,
        scratch_dir = %config.listing.scratch_dir.display(),
        "Resource service configured"
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
