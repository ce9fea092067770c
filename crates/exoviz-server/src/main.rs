// =============================================================================
// Exoviz Server - Dashboard Entry Point
// =============================================================================
// Table of Contents:
// 1. Imports
// 2. Main Entry Point
// =============================================================================
//
// Usage:
//   cargo run -p exoviz-server
//   EXOVIZ_DATA=path/to/spacedata.csv BIND_ADDRESS=127.0.0.1:9000 cargo run -p exoviz-server

// -----------------------------------------------------------------------------
// 1. Imports
// -----------------------------------------------------------------------------

mod config;
mod error;
mod routes;

use std::sync::Arc;

use exoviz_logic::SkyContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::routes::{create_router, AppState};

// -----------------------------------------------------------------------------
// 2. Main Entry Point
// -----------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // The sky tables are built once; a bad catalog aborts startup.
    let sky = SkyContext::initialize(config.sky.clone()).map_err(|e| {
        tracing::error!(
            "Failed to load catalog {}: {}",
            config.sky.data_path.display(),
            e
        );
        e
    })?;

    let state = AppState { sky: Arc::new(sky) };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Exoviz dashboard running on http://{}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
