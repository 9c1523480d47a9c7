//! Storage setup and initialization

use anyhow::{Context, Result};
use attache_core::Config;
use attache_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the configured object storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        key_prefix = %config.key_prefix(),
        "Storage initialized successfully"
    );

    Ok(storage)
}
