//! EcoCollect Service - HTTP API for the report lifecycle engine.
//!
//! This is the main entry point for the ecocollect service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecocollect_service::{create_router, spawn_dispatcher, AppState, ServiceConfig};
use ecocollect_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ecocollect=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EcoCollect Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        reward_points = config.reward_points,
        dispatcher_enabled = config.dispatcher_enabled,
        "Service configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    // Build app state
    let state = Arc::new(AppState::new(store, config.clone()));

    // Start the in-process trigger dispatcher
    if config.dispatcher_enabled {
        spawn_dispatcher(Arc::clone(&state));
    } else {
        tracing::warn!("Trigger dispatcher disabled - relying on external trigger delivery");
    }

    // Create the router
    let app = create_router((*state).clone());
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
