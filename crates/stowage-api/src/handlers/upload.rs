use crate::constants::UPLOAD_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    Json,
};
use futures::TryStreamExt;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use stowage_core::UploadResponse;
use stowage_storage::{UploadError, UploadRequest};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;

/// Stream a single file to the upload directory.
///
/// Only the first `file` field is consumed; fields before it are skipped and
/// anything after it is left unread. That field must carry a filename.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part provided", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Failed to receive or save the file", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }
        // A plain form value named `file` is not a file.
        if field.file_name().is_none() {
            return Err(UploadError::MissingInput.into());
        }

        let request = UploadRequest {
            filename: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            reader: Some(field_reader(field)),
        };
        let result = state.uploader.accept_upload(request).await?;
        return Ok(Json(result.into()));
    }

    Err(UploadError::MissingInput.into())
}

/// Adapt a multipart field into a byte reader for the storage layer.
fn field_reader<'a>(field: Field<'a>) -> Pin<Box<dyn AsyncRead + Send + 'a>> {
    Box::pin(StreamReader::new(field.map_err(io::Error::other)))
}
