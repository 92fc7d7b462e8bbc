//! Startup cleanup of staging files left behind by a crash.

use crate::error::{StorageResult, UploadError};
use crate::staging::{STAGING_PREFIX, STAGING_SUFFIX};
use std::path::Path;
use tokio::fs;

/// Remove staging files from `dir`. Returns how many were removed.
///
/// Published uploads and subdirectories are never touched. A file that cannot
/// be removed is logged and skipped.
pub async fn sweep_stale_uploads(dir: &Path) -> StorageResult<usize> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| {
        UploadError::ConfigError(format!(
            "Failed to scan upload directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut removed = 0;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(UploadError::StorageFailure)?
    {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_staging_name(name) {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => {}
            _ => continue,
        }

        let path = entry.path();
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(staging_path = %path.display(), "Removed stale staging file");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    staging_path = %path.display(),
                    "Failed to remove stale staging file"
                );
            }
        }
    }

    Ok(removed)
}

fn is_staging_name(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX) && name.ends_with(STAGING_SUFFIX)
}
