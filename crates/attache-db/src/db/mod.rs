//! Database repositories for the data access layer
//
// Attachment file metadata (trait + Postgres repository)
pub mod attachment;
//
// In-memory store for tests
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
//
// Transaction utilities
pub mod transaction;
