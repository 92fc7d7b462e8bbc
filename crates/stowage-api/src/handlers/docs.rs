use crate::constants::{EXAMPLE_CURL, UPLOAD_FIELD};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// How to call the upload endpoint against this deployment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsageResponse {
    pub example_curl: String,
    pub max_size_bytes: u64,
    pub upload_field: String,
    pub destination_dir: String,
}

#[utoipa::path(
    get,
    path = "/docs/usage",
    tag = "docs",
    responses(
        (status = 200, description = "Upload usage for this deployment", body = UsageResponse)
    )
)]
pub async fn usage(State(state): State<Arc<AppState>>) -> Json<UsageResponse> {
    let uploads = state.uploader.config();
    Json(UsageResponse {
        example_curl: EXAMPLE_CURL.to_string(),
        max_size_bytes: uploads.max_file_size_bytes,
        upload_field: UPLOAD_FIELD.to_string(),
        destination_dir: uploads.upload_dir.display().to_string(),
    })
}
