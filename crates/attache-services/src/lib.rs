//! Attache Services Layer
//!
//! This crate is the business service layer: it hosts the file transfer orchestration
//! (metadata record, local staging, object storage push, streamed download) and
//! re-exports the storage and metadata APIs so the API crate depends on a single
//! service facade. Keep coordination here; keep thin HTTP handling in attache-api.

pub mod transfer;

pub use attache_db::{AttachmentFileRepository, AttachmentStore};
pub use attache_storage::{
    create_storage, object_key, ByteStream, LocalStorage, S3Storage, Storage, StorageBackend,
    StorageError, StorageResult,
};
pub use transfer::{attachment_disposition, FileTransferService, UploadedFile};
