//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Upload failures and extractor
//! rejections convert into `HttpAppError`, which logs at the variant's level
//! and renders `{"detail": "..."}` with the variant's status code. Only the
//! client message is rendered; causes stay in the log.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stowage_core::{AppError, ErrorMetadata, LogLevel};
use stowage_storage::UploadError;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Wrapper so `IntoResponse` can be implemented for `AppError` from `stowage-core`.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        let app_error = match err {
            UploadError::MissingInput => AppError::InvalidInput("No file part provided.".into()),
            UploadError::PayloadTooLarge { limit } => {
                AppError::PayloadTooLarge(payload_too_large_message(limit))
            }
            UploadError::StreamFailure(e) => AppError::StreamFailure(e),
            UploadError::StorageFailure(e) => AppError::Storage(e),
            UploadError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app_error)
    }
}

/// The request was not readable as multipart at all.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid multipart request: {}",
            rejection.body_text()
        )))
    }
}

/// The multipart body broke before the `file` field was reached.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Malformed multipart body: {}",
            err.body_text()
        )))
    }
}

pub fn payload_too_large_message(limit: u64) -> String {
    format!(
        "File too large. Max allowed size is {} bytes ({} MB).",
        limit,
        limit / 1024 / 1024
    )
}

/// Sensitive errors never reach the client, so their full source chain goes to the log.
fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    let message = if error.is_sensitive() {
        error.detailed_message()
    } else {
        error.to_string()
    };

    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %message, error_type, error_code, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %message, error_type, error_code, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %message, error_type, error_code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorResponse::new(app_error.client_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    async fn render(err: HttpAppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_missing_input_is_bad_request() {
        let (status, body) = render(UploadError::MissingInput.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "No file part provided.");
    }

    #[tokio::test]
    async fn test_payload_too_large_reports_limit() {
        let limit = 500 * 1024 * 1024;
        let (status, body) = render(UploadError::PayloadTooLarge { limit }.into()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body.detail,
            "File too large. Max allowed size is 524288000 bytes (500 MB)."
        );
    }

    #[tokio::test]
    async fn test_stream_failure_hides_cause() {
        let err = UploadError::StreamFailure(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "peer reset at 10.0.0.7:51234",
        ));
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "Failed to receive file data");
    }

    #[test]
    fn test_stream_failure_keeps_io_source() {
        let err = HttpAppError::from(UploadError::StreamFailure(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "client went away",
        )));

        let source = std::error::Error::source(&err.0)
            .and_then(|e| e.downcast_ref::<io::Error>())
            .expect("io source");
        assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
        assert!(err.0.detailed_message().contains("Caused by: client went away"));
    }

    #[tokio::test]
    async fn test_storage_failure_hides_path() {
        let err = UploadError::StorageFailure(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "/srv/upload/20250101T000000Z_x.mp4",
        ));
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "Failed to save file");
    }

    #[tokio::test]
    async fn test_config_error_is_generic_internal() {
        let err = UploadError::ConfigError("Failed to ensure upload directory".into());
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, stowage_core::error::GENERIC_INTERNAL_MESSAGE);
    }

    #[test]
    fn test_payload_too_large_message_rounds_down() {
        assert_eq!(
            payload_too_large_message(1536 * 1024),
            "File too large. Max allowed size is 1572864 bytes (1 MB)."
        );
    }
}
