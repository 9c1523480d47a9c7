//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use attache_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attache API",
        version = "0.1.0",
        description = "Attachment file transfer API (v0). Files are staged locally, pushed to object storage under a prefixed key and streamed back as attachments. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::file_upload::upload_file,
        handlers::file_download::download_file,
    ),
    components(
        schemas(
            models::AttachmentFile,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "files", description = "Attachment file upload and download")
    )
)]
pub struct ApiDoc;
