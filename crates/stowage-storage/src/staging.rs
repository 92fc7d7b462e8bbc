//! Bounded staging of an incoming byte stream.
//!
//! The staging file lives in the destination directory so the later publish
//! is a same-filesystem rename. Its path is held by a [`TempPath`], which
//! removes the file when dropped; only [`crate::publish`] disarms it.

use crate::error::{StorageResult, UploadError};
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

/// Maximum number of bytes read from the input per step.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Marks files that have not been published yet.
pub const STAGING_PREFIX: &str = ".uploading_";
pub const STAGING_SUFFIX: &str = ".part";

/// An open staging file with a running byte count.
///
/// Dropping it at any point removes the file from disk.
pub struct StagedFile {
    // Declared before `path` so the handle is closed before removal.
    file: File,
    path: TempPath,
    bytes_written: u64,
    limit: u64,
}

/// A fully written staging file waiting to be published.
///
/// Still removed from disk on drop.
#[derive(Debug)]
pub struct StagedUpload {
    pub(crate) path: TempPath,
    pub(crate) size_bytes: u64,
}

impl StagedFile {
    /// Create a new, empty staging file inside `dir`.
    pub async fn create_in(dir: &Path, limit: u64) -> StorageResult<Self> {
        let path = dir.join(format!(
            "{}{}{}",
            STAGING_PREFIX,
            Uuid::new_v4().simple(),
            STAGING_SUFFIX
        ));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(UploadError::StreamFailure)?;

        let path = match TempPath::try_from_path(&path) {
            Ok(guard) => guard,
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(UploadError::StreamFailure(e));
            }
        };

        tracing::debug!(staging_path = %path.display(), limit_bytes = limit, "Staging file created");

        Ok(StagedFile {
            file,
            path,
            bytes_written: 0,
            limit,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Account for `chunk` and append it.
    ///
    /// A chunk that would take the total past the limit is rejected whole and
    /// nothing from it is written.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        let total = self
            .bytes_written
            .checked_add(chunk.len() as u64)
            .ok_or(UploadError::PayloadTooLarge { limit: self.limit })?;
        if total > self.limit {
            return Err(UploadError::PayloadTooLarge { limit: self.limit });
        }

        self.file
            .write_all(chunk)
            .await
            .map_err(UploadError::StreamFailure)?;
        self.bytes_written = total;
        Ok(())
    }

    /// Flush and sync the staging file, then close the handle.
    pub async fn finish(mut self) -> StorageResult<StagedUpload> {
        self.file
            .flush()
            .await
            .map_err(UploadError::StreamFailure)?;
        self.file
            .sync_all()
            .await
            .map_err(UploadError::StreamFailure)?;

        let StagedFile {
            file,
            path,
            bytes_written,
            ..
        } = self;
        drop(file);

        Ok(StagedUpload {
            path,
            size_bytes: bytes_written,
        })
    }
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Drain `reader` into a new staging file in `destination_dir`.
///
/// Stops reading as soon as the running total exceeds `limit_bytes`; the rest
/// of the input is left unread. On any error the staging file is gone by the
/// time this returns.
pub async fn write_bounded<R>(
    reader: &mut R,
    limit_bytes: u64,
    destination_dir: &Path,
) -> StorageResult<StagedUpload>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut staged = StagedFile::create_in(destination_dir, limit_bytes).await?;
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(UploadError::StreamFailure)?;
        if n == 0 {
            break;
        }
        staged.write_chunk(&buf[..n]).await?;
    }

    staged.finish().await
}
