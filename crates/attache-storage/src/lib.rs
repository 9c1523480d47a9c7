//! Attache Storage Library
//!
//! This crate provides the object storage abstraction and its implementations
//! (S3 via `object_store`, and the local filesystem).
//!
//! # Storage key format
//!
//! Every object lives at `{prefix}/{storage_name}`, where the prefix is configured
//! (`s3_data` by default) and the storage name is the generated `{token}_{original}` name.
//! Keys must not contain a `..` segment or a leading `/`. Key generation is centralized in the
//! `keys` module so callers and backends agree.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use attache_core::StorageBackend;
pub use factory::create_storage;
pub use keys::object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
