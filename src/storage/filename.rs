//! Collision-free filename allocation.
//!
//! The allocator never checks for existence and writes later: each candidate
//! name is claimed with an exclusive create, so two concurrent pulls into the
//! same directory can never end up with the same file.

use super::path::ResolvedDestination;
use crate::error::{Error, Result};

use std::io;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tracing::debug;

/// Upper bound on disambiguators tried before giving up.
pub const MAX_DISAMBIGUATOR: u32 = 10_000;

/// Build the `n`-th candidate for `base`: `report.zip`, `report-1.zip`, ...
pub fn disambiguated(base: &str, n: u32) -> String {
    if n == 0 {
        return base.to_string();
    }
    match base.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{}{}", &base[..dot], n, &base[dot..]),
        _ => format!("{}-{}", base, n),
    }
}

/// Claim a name derived from `base` inside `directory` and open it for writing.
///
/// Existing files are never opened, truncated or replaced.
pub async fn allocate(directory: &Path, base: &str) -> Result<(ResolvedDestination, File)> {
    for n in 0..=MAX_DISAMBIGUATOR {
        let candidate = disambiguated(base, n);
        let path = directory.join(&candidate);

        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => {
                debug!(file = %path.display(), "Allocated destination file");
                return Ok((ResolvedDestination::new(directory, &candidate), file));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(Error::DirectoryNotWritable {
                    path: directory.to_path_buf(),
                })
            }
            Err(source) => return Err(Error::FileNotAccessible { path, source }),
        }
    }

    Err(Error::FileNotAccessible {
        path: directory.join(base),
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name left for \"{}\"", base),
        ),
    })
}
