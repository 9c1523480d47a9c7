//! Attache Core Library
//!
//! This crate provides the domain model, error types and configuration
//! shared across all Attache components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, TransferConfig, DEFAULT_KEY_PREFIX};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AttachmentFile, NewAttachmentFile};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in the attache-storage crate
