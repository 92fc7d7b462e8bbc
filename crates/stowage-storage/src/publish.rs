//! Atomic publish of a staged upload.

use crate::error::{StorageResult, UploadError};
use crate::staging::StagedUpload;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::PathPersistError;

/// A published upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

/// Rename `staged` to `destination_dir/final_name`.
///
/// The rename never replaces an existing file. On failure the staging file
/// is removed before `StorageFailure` is returned. Once started, the rename
/// completes even if this future is dropped.
pub async fn publish(
    staged: StagedUpload,
    destination_dir: &Path,
    final_name: &str,
) -> StorageResult<StoredFile> {
    let dest_path = destination_dir.join(final_name);
    let StagedUpload { path, size_bytes } = staged;

    let target = dest_path.clone();
    let outcome = tokio::task::spawn_blocking(move || path.persist_noclobber(&target)).await;

    match outcome {
        Ok(Ok(())) => Ok(StoredFile {
            path: dest_path,
            name: final_name.to_string(),
            size_bytes,
        }),
        Ok(Err(PathPersistError { error, path })) => {
            let staging_path = path.to_path_buf();
            if let Err(cleanup_err) = path.close() {
                tracing::warn!(
                    error = %cleanup_err,
                    staging_path = %staging_path.display(),
                    "Failed to remove staging file after publish error"
                );
            }
            tracing::error!(
                error = %error,
                staging_path = %staging_path.display(),
                dest_path = %dest_path.display(),
                "Failed to publish upload"
            );
            Err(UploadError::StorageFailure(error))
        }
        // The staging path was dropped, and removed, inside the failed task.
        Err(join_err) => Err(UploadError::StorageFailure(io::Error::other(join_err))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::write_bounded;
    use tempfile::tempdir;

    async fn stage(dir: &Path, data: &[u8]) -> StagedUpload {
        let mut reader = std::io::Cursor::new(data.to_vec());
        write_bounded(&mut reader, 1024 * 1024, dir).await.unwrap()
    }

    fn entry_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_publish_moves_staged_file() {
        let dir = tempdir().unwrap();
        let staged = stage(dir.path(), b"video bytes").await;
        let staging_path = staged.path().to_path_buf();

        let stored = publish(staged, dir.path(), "final.mp4").await.unwrap();

        assert_eq!(stored.path, dir.path().join("final.mp4"));
        assert_eq!(stored.name, "final.mp4");
        assert_eq!(stored.size_bytes, 11);
        assert!(!staging_path.exists());
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"video bytes");
        assert_eq!(entry_count(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_removes_staging_file() {
        let dir = tempdir().unwrap();
        let staged = stage(dir.path(), b"doomed").await;
        let staging_path = staged.path().to_path_buf();

        let result = publish(staged, dir.path(), "missing-subdir/final.mp4").await;

        match result {
            Err(UploadError::StorageFailure(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("Expected StorageFailure, got {:?}", other),
        }
        assert!(!staging_path.exists());
        assert!(!dir.path().join("missing-subdir/final.mp4").exists());
        assert_eq!(entry_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_publish_never_overwrites() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("taken.mp4"), b"existing").unwrap();
        let staged = stage(dir.path(), b"newcomer").await;

        let result = publish(staged, dir.path(), "taken.mp4").await;

        assert!(matches!(result, Err(UploadError::StorageFailure(_))));
        assert_eq!(
            std::fs::read(dir.path().join("taken.mp4")).unwrap(),
            b"existing"
        );
        assert_eq!(entry_count(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_dropped_publish_still_completes_rename() {
        let dir = tempdir().unwrap();
        let staged = stage(dir.path(), b"late").await;

        let mut pending = Box::pin(publish(staged, dir.path(), "late.mp4"));
        let _ = futures::poll!(pending.as_mut());
        drop(pending);

        let dest = dir.path().join("late.mp4");
        for _ in 0..100 {
            if dest.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(std::fs::read(&dest).unwrap(), b"late");
        assert_eq!(entry_count(dir.path()), 1);
    }
}
