//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use attache_core::Config;
use attache_db::AttachmentFileRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    tokio::fs::create_dir_all(config.upload_dir())
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir()))?;
    tracing::info!(upload_dir = %config.upload_dir(), "Staging directory ready");

    let store = Arc::new(AttachmentFileRepository::new(pool));
    let state = Arc::new(AppState::from_config(&config, store, storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
