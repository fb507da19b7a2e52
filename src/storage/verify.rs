//! Post-download verification.
//!
//! A connection that closes early without a transport error leaves a short
//! file behind; comparing against the advertised `Content-Length` catches it.

use crate::error::{Error, Result};

use std::path::Path;
use tokio::fs::{self, File};

/// Check that `path` is a readable file and, when `expected_len` is known,
/// that its size matches exactly. Returns the size on disk.
pub async fn verify_download(path: &Path, expected_len: Option<u64>) -> Result<u64> {
    let not_accessible = |source| Error::FileNotAccessible {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).await.map_err(not_accessible)?;
    if !metadata.is_file() {
        return Err(not_accessible(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    // Opening proves readability for the current user.
    File::open(path).await.map_err(not_accessible)?;

    let actual = metadata.len();
    match expected_len {
        Some(expected) if expected != actual => Err(Error::SizeMismatch { expected, actual }),
        _ => Ok(actual),
    }
}
