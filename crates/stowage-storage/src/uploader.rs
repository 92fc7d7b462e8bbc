//! End-to-end accept-and-store operation.

use crate::error::{StorageResult, UploadError};
use crate::naming::{FilenameGenerator, TimestampedFilename, FALLBACK_FILENAME};
use crate::publish::publish;
use crate::staging::write_bounded;
use std::path::PathBuf;
use std::sync::Arc;
use stowage_core::{Config, UploadResponse};
use tokio::fs;
use tokio::io::AsyncRead;

/// Destination and limit for every upload handled by an [`Uploader`].
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub upload_dir: PathBuf,
    pub max_file_size_bytes: u64,
}

impl From<&Config> for UploadConfig {
    fn from(config: &Config) -> Self {
        UploadConfig {
            upload_dir: config.upload_dir().to_path_buf(),
            max_file_size_bytes: config.max_file_size_bytes(),
        }
    }
}

/// A single incoming file.
///
/// `filename` and `content_type` come straight from the client and are never
/// trusted: the filename only contributes its extension, the content type is
/// echoed back untouched.
pub struct UploadRequest<R> {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub reader: Option<R>,
}

/// Metadata of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub filename: String,
    pub saved_as: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub upload_dir: String,
}

impl From<UploadResult> for UploadResponse {
    fn from(result: UploadResult) -> Self {
        UploadResponse {
            filename: result.filename,
            saved_as: result.saved_as,
            size_bytes: result.size_bytes,
            content_type: result.content_type,
            upload_dir: result.upload_dir,
        }
    }
}

/// Streams uploads into the configured directory.
///
/// Holds no mutable state; clone it or share it behind an `Arc`.
#[derive(Clone)]
pub struct Uploader {
    config: UploadConfig,
    names: Arc<dyn FilenameGenerator>,
}

impl Uploader {
    pub fn new(config: UploadConfig) -> Self {
        Self::with_generator(config, Arc::new(TimestampedFilename))
    }

    pub fn with_generator(config: UploadConfig, names: Arc<dyn FilenameGenerator>) -> Self {
        Uploader { config, names }
    }

    /// Create the upload directory if needed and build an uploader for it.
    pub async fn init(config: UploadConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.upload_dir).await.map_err(|e| {
            UploadError::ConfigError(format!(
                "Failed to ensure upload directory at {}: {}",
                config.upload_dir.display(),
                e
            ))
        })?;

        Ok(Self::new(config))
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Stream `request` to disk and publish it under a generated name.
    pub async fn accept_upload<R>(&self, request: UploadRequest<R>) -> StorageResult<UploadResult>
    where
        R: AsyncRead + Unpin,
    {
        let UploadRequest {
            filename,
            content_type,
            reader,
        } = request;
        let mut reader = reader.ok_or(UploadError::MissingInput)?;

        let content_type = content_type.filter(|ct| !ct.is_empty());
        if let Some(ct) = content_type.as_deref() {
            if !is_video_content_type(ct) {
                tracing::debug!(content_type = %ct, "Accepting upload with non-video content type");
            }
        }

        let start = std::time::Instant::now();
        let limit = self.config.max_file_size_bytes;
        let upload_dir = &self.config.upload_dir;

        let staged = match write_bounded(&mut reader, limit, upload_dir).await {
            Ok(staged) => staged,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    limit_bytes = limit,
                    upload_dir = %upload_dir.display(),
                    "Upload aborted while streaming"
                );
                return Err(e);
            }
        };
        drop(reader);

        let original = filename.filter(|name| !name.is_empty());
        let saved_as = self
            .names
            .generate(original.as_deref().unwrap_or(FALLBACK_FILENAME));

        let stored = publish(staged, upload_dir, &saved_as).await?;

        tracing::info!(
            saved_as = %stored.name,
            size_bytes = stored.size_bytes,
            upload_dir = %upload_dir.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(UploadResult {
            filename: original.unwrap_or_else(|| stored.name.clone()),
            saved_as: stored.name,
            size_bytes: stored.size_bytes,
            content_type,
            upload_dir: upload_dir.display().to_string(),
        })
    }
}

/// Advisory only: browsers label video files inconsistently, so a mismatch is
/// logged and never rejected.
pub fn is_video_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase();
    mime.starts_with("video/") || mime == "application/octet-stream" || mime.is_empty()
}
