//! Configuration structures and defaults for the downloader.
//!
//! Everything the core operation needs to know about its environment lives
//! in a [`DownloaderConfig`] value handed to it at construction: the
//! application root custom paths are sandboxed under, the default backup
//! directory, the directories offered to the operator, and the HTTP policy.
//!
//! # Examples
//!
//! ```rust
//! use puller::downloader::DownloaderConfig;
//! use std::path::PathBuf;
//!
//! let config = DownloaderConfig {
//!     application_root: PathBuf::from("/var/www/site"),
//!     ..DownloaderConfig::default()
//! };
//! assert_eq!(config.backup_directory(), PathBuf::from("/var/www/site/backups"));
//! ```

use crate::http::HttpClientConfig;
use crate::progress::ProgressCallback;

use std::env::current_dir;
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// Backup directory name under the application root, unless configured.
pub const DEFAULT_BACKUP_DIR: &str = "backups";
/// Upload directory name under the application root, offered as a destination.
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Configuration structure for the downloader.
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Root that custom directory paths are joined to.
    pub application_root: PathBuf,
    /// Directory used when no directory token is given.
    /// Defaults to `<application_root>/backups`.
    pub backup_directory: Option<PathBuf>,
    /// Directories offered to the operator.
    /// Defaults to the backup and upload directories.
    pub candidate_directories: Option<Vec<PathBuf>>,
    /// HTTP client policy.
    pub http: HttpClientConfig,
    /// Callback for each chunk written to disk.
    pub on_progress: Option<ProgressCallback>,
}

impl DownloaderConfig {
    /// Get the effective backup directory.
    pub fn backup_directory(&self) -> PathBuf {
        self.backup_directory
            .clone()
            .unwrap_or_else(|| self.application_root.join(DEFAULT_BACKUP_DIR))
    }

    /// Get the effective candidate directories, without duplicates.
    pub fn candidate_directories(&self) -> Vec<PathBuf> {
        let candidates = self.candidate_directories.clone().unwrap_or_else(|| {
            vec![
                self.backup_directory(),
                self.application_root.join(DEFAULT_UPLOADS_DIR),
                self.application_root.join(DEFAULT_BACKUP_DIR),
            ]
        });

        let mut unique: Vec<PathBuf> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        unique
    }
}

/// The working directory, or an empty root when it cannot be determined.
///
/// An empty root makes every custom path fail with `UnsafePath` until a
/// root is configured.
fn default_application_root(cwd: io::Result<PathBuf>) -> PathBuf {
    cwd.unwrap_or_else(|e| {
        warn!("Cannot determine the working directory, set an application root: {}", e);
        PathBuf::new()
    })
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("application_root", &self.application_root)
            .field("backup_directory", &self.backup_directory)
            .field("candidate_directories", &self.candidate_directories)
            .field("http", &self.http)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            application_root: default_application_root(current_dir()),
            backup_directory: None,
            candidate_directories: None,
            http: HttpClientConfig::default(),
            on_progress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &str) -> DownloaderConfig {
        DownloaderConfig {
            application_root: PathBuf::from(root),
            ..DownloaderConfig::default()
        }
    }

    #[test]
    fn test_backup_directory_follows_root() {
        assert_eq!(
            config("/site").backup_directory(),
            PathBuf::from("/site/backups")
        );
    }

    #[test]
    fn test_explicit_backup_directory() {
        let config = DownloaderConfig {
            backup_directory: Some(PathBuf::from("/srv/dumps")),
            ..config("/site")
        };
        assert_eq!(config.backup_directory(), PathBuf::from("/srv/dumps"));
    }

    #[test]
    fn test_default_candidates_are_deduplicated() {
        assert_eq!(
            config("/site").candidate_directories(),
            vec![PathBuf::from("/site/backups"), PathBuf::from("/site/uploads")]
        );
    }

    #[test]
    fn test_default_root_without_working_directory() {
        let cwd = Err(io::Error::new(io::ErrorKind::NotFound, "removed"));
        assert_eq!(default_application_root(cwd), PathBuf::new());
        assert_eq!(
            default_application_root(Ok(PathBuf::from("/site"))),
            PathBuf::from("/site")
        );
    }

    #[test]
    fn test_debug_hides_callback() {
        let debug = format!("{:?}", config("/site"));
        assert!(debug.contains("DownloaderConfig"));
        assert!(debug.contains("on_progress: false"));
    }
}
