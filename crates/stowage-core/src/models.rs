//! Response models returned by the upload API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Original filename submitted by the client.
    pub filename: String,
    /// Saved filename on server.
    pub saved_as: String,
    /// Size of the uploaded file in bytes.
    pub size_bytes: u64,
    /// Content type declared by the client, passed through unvalidated.
    pub content_type: Option<String>,
    /// Directory path where the file is saved.
    pub upload_dir: String,
}
