//! Attachment file metadata model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Metadata record for an uploaded file.
///
/// `file_name` is the generated storage name (`{token}_{original_file_name}`) used for
/// both the staging path and the object key; `original_file_name` is what the client sent
/// and what downloads are served as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttachmentFile {
    /// Auto-assigned record number
    pub id: i64,
    pub file_name: String,
    pub original_file_name: String,
    /// Staging directory the file passed through
    pub file_path: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Values for a record that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachmentFile {
    pub file_name: String,
    pub original_file_name: String,
    pub file_path: String,
    pub file_size: i64,
}

impl NewAttachmentFile {
    /// Attach the store-assigned identity.
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> AttachmentFile {
        AttachmentFile {
            id,
            file_name: self.file_name,
            original_file_name: self.original_file_name,
            file_path: self.file_path,
            file_size: self.file_size,
            created_at,
        }
    }
}
