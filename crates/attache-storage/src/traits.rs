//! Storage abstraction trait
//!
//! This module defines the Storage trait that all object storage backends implement.

use crate::StorageBackend;
use attache_core::AppError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked object body. Dropping it releases the underlying connection or file handle.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Every storage failure other than local I/O is a remote-store failure from the caller's
/// point of view, including a missing object: the metadata record said it should exist.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::IoError(e) => AppError::Io(e),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Object storage abstraction
///
/// Implementations are bound to a single bucket (or root directory) at construction.
/// Keys follow the `{prefix}/{storage_name}` layout described at the crate root.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Push a file from the local filesystem to `storage_key`.
    ///
    /// Returns the number of bytes stored.
    async fn put_file(&self, storage_key: &str, local_path: &Path) -> StorageResult<u64>;

    /// Open the object at `storage_key` as a stream of chunks.
    ///
    /// Fails with `StorageError::NotFound` when no object exists at the key.
    async fn get_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
