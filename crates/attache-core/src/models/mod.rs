//! Domain models
//!
//! Attachment file records are the only persisted entity.

pub mod attachment;

pub use attachment::{AttachmentFile, NewAttachmentFile};
