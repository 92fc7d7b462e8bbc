//! OpenAPI documentation, served at `/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use stowage_core::UploadResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Video Upload Backend",
        version = "0.1.0",
        description = "Streams single-file multipart uploads to a local directory. Files are written under a generated name and only appear once completely received; uploads over the size limit are rejected with 413."
    ),
    paths(
        handlers::health::health_check,
        handlers::upload::upload_file,
        handlers::docs::usage,
    ),
    components(schemas(
        UploadResponse,
        ErrorResponse,
        handlers::health::HealthResponse,
        handlers::docs::UsageResponse,
    )),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "uploads", description = "File uploads"),
        (name = "docs", description = "Usage documentation")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
