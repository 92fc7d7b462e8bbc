//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use stowage_core::Config;

/// Validate config, start tracing, prepare the upload directory and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .context("Failed to initialize telemetry")?;

    tracing::info!("Configuration loaded and validated successfully");

    let uploader = storage::setup_uploader(&config).await?;

    let state = AppState::new(config.clone(), uploader);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
