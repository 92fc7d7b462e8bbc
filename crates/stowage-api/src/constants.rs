//! Route paths and fixed values shared by handlers, routing and docs.

/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

pub const HEALTH_PATH: &str = "/";
pub const UPLOAD_PATH: &str = "/upload";
pub const USAGE_PATH: &str = "/docs/usage";
pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/openapi.json";

/// Shown by the usage endpoint.
pub const EXAMPLE_CURL: &str =
    "curl -X POST -F \"file=@/path/to/video.mp4\" http://localhost:8000/upload";
