//! Application state shared by every handler.

use attache_core::Config;
use attache_services::{AttachmentStore, FileTransferService, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub transfer: FileTransferService,
    /// Request body ceiling, also applied to the multipart extractor.
    pub max_file_size_bytes: usize,
}

impl AppState {
    pub fn new(transfer: FileTransferService, max_file_size_bytes: usize) -> Self {
        Self {
            transfer,
            max_file_size_bytes,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn AttachmentStore>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self::new(
            FileTransferService::from_config(config, store, storage),
            config.max_file_size_bytes(),
        )
    }
}
