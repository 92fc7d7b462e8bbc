//! Stowage Storage Library
//!
//! Streams a single upload into a local directory without buffering it in
//! memory, enforcing a hard size limit along the way.
//!
//! # Upload lifecycle
//!
//! 1. [`staging`] drains the input into `.uploading_<token>.part` inside the
//!    destination directory, counting bytes and aborting on overflow.
//! 2. [`naming`] derives the final name `<UTC timestamp>_<token><ext>`.
//! 3. [`publish`] renames the staging file into place without replacing
//!    anything that already exists.
//!
//! [`uploader::Uploader`] runs the three steps. A staging file that never
//! reaches step 3 is removed on every exit path, including when the
//! in-flight future is dropped.

pub mod error;
pub mod naming;
pub mod publish;
pub mod staging;
pub mod sweep;
pub mod uploader;

// Re-export commonly used types
pub use error::{StorageResult, UploadError};
pub use naming::{FilenameGenerator, TimestampedFilename, FALLBACK_FILENAME};
pub use publish::{publish, StoredFile};
pub use staging::{write_bounded, StagedFile, StagedUpload, CHUNK_SIZE};
pub use sweep::sweep_stale_uploads;
pub use uploader::{UploadConfig, UploadRequest, UploadResult, Uploader};
