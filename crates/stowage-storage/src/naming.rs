//! Destination filename generation.
//!
//! Only the extension of the client's filename survives into the saved name;
//! the base name is discarded.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Name used when the client did not send a filename.
pub const FALLBACK_FILENAME: &str = "upload.bin";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Produces the final name of a published upload.
pub trait FilenameGenerator: Send + Sync {
    fn generate(&self, original_filename: &str) -> String;
}

/// `<UTC timestamp>_<uuid v4 hex><ext>`, e.g. `20250101T120000Z_9f0c...e1.mp4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampedFilename;

impl FilenameGenerator for TimestampedFilename {
    fn generate(&self, original_filename: &str) -> String {
        generate_filename(original_filename, Utc::now())
    }
}

/// Build a saved filename for `original_filename` at time `now`.
pub fn generate_filename(original_filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}{}",
        now.format(TIMESTAMP_FORMAT),
        Uuid::new_v4().simple(),
        extension_of(original_filename)
    )
}

/// Lower-cased extension of the last path component, including the dot.
///
/// Leading dots do not start an extension (`.bashrc` has none). An extension
/// containing a control character is dropped.
pub fn extension_of(filename: &str) -> String {
    let name = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let name = name.trim_start_matches('.');

    match name.rfind('.') {
        Some(idx) => {
            let ext = &name[idx..];
            if ext.chars().any(char::is_control) {
                String::new()
            } else {
                ext.to_lowercase()
            }
        }
        None => String::new(),
    }
}
