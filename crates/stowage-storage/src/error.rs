//! Upload error kinds
//!
//! Every kind is terminal for the operation that raised it. Kinds raised after
//! a staging file exists are only returned once that file has been removed.

use thiserror::Error;

/// Upload operation errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part provided")]
    MissingInput,

    #[error("Upload exceeds the maximum allowed size of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to receive file data: {0}")]
    StreamFailure(#[source] std::io::Error),

    #[error("Failed to save file: {0}")]
    StorageFailure(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for upload operations
pub type StorageResult<T> = Result<T, UploadError>;
