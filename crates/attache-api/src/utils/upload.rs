//! Multipart extraction for the upload handler

use crate::error::HttpAppError;
use attache_core::AppError;
use attache_services::UploadedFile;
use axum::extract::Multipart;

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Extract the `file` field from a multipart form.
///
/// Returns `Ok(None)` when the form has no `file` field; the transfer service decides
/// what an absent file means. A second `file` field is rejected. Other fields are
/// ignored.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<Option<UploadedFile>, HttpAppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if field_name != FILE_FIELD {
            continue;
        }

        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            )
            .into());
        }

        let filename = field
            .file_name()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let data = field.bytes().await?;

        tracing::debug!(
            original_filename = %filename,
            size_bytes = data.len(),
            "Received multipart file"
        );

        file = Some(UploadedFile::from_bytes(filename, data));
    }

    Ok(file)
}
