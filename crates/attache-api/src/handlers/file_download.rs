use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
};
use futures::StreamExt;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "Attachment file number")
    ),
    responses(
        (status = 200, description = "File content as an attachment", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(attachment_file_no = id, operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, HttpAppError> {
    let response = state.transfer.download(id).await?;

    // Wrap storage stream for axum Body
    Ok(response.map(|stream| {
        Body::from_stream(stream.map(|result| {
            result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
        }))
    }))
}
