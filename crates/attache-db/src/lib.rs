//! Attache database layer
//!
//! Metadata persistence for uploaded files: the `AttachmentStore` trait the transfer
//! service depends on, its Postgres implementation, and transaction helpers.

pub mod db;

pub use db::attachment::{AttachmentFileRepository, AttachmentStore};
#[cfg(any(test, feature = "test-support"))]
pub use db::memory::InMemoryAttachmentStore;
pub use db::transaction::with_transaction;
