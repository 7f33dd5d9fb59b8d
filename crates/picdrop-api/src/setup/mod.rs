//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use picdrop_core::Config;
use std::sync::Arc;

/// Build the storage backend, shared state and router for a configuration.
///
/// Does not touch global state, so tests can build any number of apps.
pub async fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    let storage = picdrop_storage::create_storage(&config)
        .await
        .context("Failed to initialize upload storage")?;

    tracing::info!(
        upload_dir = %config.upload_dir().display(),
        "Upload storage ready"
    );

    let state = Arc::new(AppState::new(config.clone(), storage));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(environment = %config.environment(), "Configuration loaded");

    build_app(config).await
}
