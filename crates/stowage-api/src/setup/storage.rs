//! Upload directory setup

use anyhow::{Context, Result};
use stowage_core::Config;
use stowage_storage::{sweep_stale_uploads, UploadConfig, Uploader};

/// Ensure the upload directory exists and clear staging files left by a
/// previous crash when sweeping is enabled.
pub async fn setup_uploader(config: &Config) -> Result<Uploader> {
    let uploader = Uploader::init(UploadConfig::from(config))
        .await
        .context("Failed to initialize upload directory")?;

    let upload_dir = &uploader.config().upload_dir;
    tracing::info!(
        upload_dir = %upload_dir.display(),
        limit_bytes = uploader.config().max_file_size_bytes,
        "Upload directory ready"
    );

    if config.sweep_stale_uploads() {
        match sweep_stale_uploads(upload_dir).await {
            Ok(0) => {}
            Ok(removed) => {
                tracing::info!(removed, upload_dir = %upload_dir.display(), "Removed stale staging files");
            }
            Err(e) => {
                tracing::warn!(error = %e, upload_dir = %upload_dir.display(), "Stale staging sweep failed");
            }
        }
    }

    Ok(uploader)
}
