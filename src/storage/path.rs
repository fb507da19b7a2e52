//! Destination directory resolution.
//!
//! A [`PathResolver`] turns a [`DirectoryToken`] into an absolute directory
//! that exists and is writable. Custom paths are sandboxed under the
//! application root: any `..` segment is refused before the filesystem is
//! touched.
//!
//! ```rust,no_run
//! use puller::download::DirectoryToken;
//! use puller::storage::PathResolver;
//!
//! # async fn example() -> puller::Result<()> {
//! let resolver = PathResolver::new("/var/www/site", "/var/www/site/backups");
//! let dir = resolver
//!     .resolve(&DirectoryToken::Custom("wp-content/imports".into()))
//!     .await?;
//! assert_eq!(dir, std::path::PathBuf::from("/var/www/site/wp-content/imports"));
//! # Ok(())
//! # }
//! ```

use crate::download::DirectoryToken;
use crate::error::{Error, Result};

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use tokio::fs;
use tracing::debug;

/// Resolves directory tokens against a fixed application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    application_root: PathBuf,
    backup_directory: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for the given application root and default directory.
    pub fn new(application_root: impl Into<PathBuf>, backup_directory: impl Into<PathBuf>) -> Self {
        Self {
            application_root: normalize(&application_root.into()),
            backup_directory: normalize(&backup_directory.into()),
        }
    }

    /// Get the application root custom paths are joined to.
    pub fn application_root(&self) -> &Path {
        &self.application_root
    }

    /// Get the directory used when no token is given.
    pub fn backup_directory(&self) -> &Path {
        &self.backup_directory
    }

    /// Compute the absolute directory for `token` without touching the disk.
    pub fn plan(&self, token: &DirectoryToken) -> Result<PathBuf> {
        match token {
            DirectoryToken::Default => Ok(self.backup_directory.clone()),
            DirectoryToken::Custom(custom) => self.custom_directory(custom),
            DirectoryToken::Path(path) => {
                if !path.is_absolute() || has_traversal(&path.to_string_lossy()) {
                    return Err(Error::UnsafePath {
                        path: path.display().to_string(),
                    });
                }
                Ok(normalize(path))
            }
        }
    }

    /// Compute the directory for `token`, then create it if needed and check
    /// that it is writable.
    pub async fn resolve(&self, token: &DirectoryToken) -> Result<PathBuf> {
        let directory = self.plan(token)?;
        ensure_writable_directory(&directory).await?;
        Ok(directory)
    }

    fn custom_directory(&self, custom: &str) -> Result<PathBuf> {
        let custom = custom.trim();
        if custom.is_empty() {
            return Err(Error::MissingCustomPath);
        }

        let relative = custom.trim_matches(|c| c == '/' || c == '\\');
        if has_traversal(relative) || !self.application_root.is_absolute() {
            return Err(Error::UnsafePath {
                path: custom.to_string(),
            });
        }

        Ok(normalize(&self.application_root.join(relative)))
    }
}

fn has_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment.trim() == "..")
        || Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

/// Collapse repeated and trailing separators and `.` segments.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Render `path` with exactly one trailing separator.
pub fn with_trailing_separator(path: &Path) -> String {
    let mut rendered = path.display().to_string();
    while rendered.len() > 1 && rendered.ends_with(['/', '\\']) {
        rendered.pop();
    }
    if !rendered.ends_with(MAIN_SEPARATOR) {
        rendered.push(MAIN_SEPARATOR);
    }
    rendered
}

/// Create `directory` (and its parents) if it is missing, then refuse it
/// unless this process can create files in it.
///
/// Nothing is mutated when the directory already exists.
pub async fn ensure_writable_directory(directory: &Path) -> Result<()> {
    let exists = fs::metadata(directory)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if !exists {
        debug!(directory = %directory.display(), "Creating destination directory");
        fs::create_dir_all(directory)
            .await
            .map_err(|source| Error::DirectoryCreateFailed {
                path: directory.to_path_buf(),
                source,
            })?;
    }

    let metadata = fs::metadata(directory)
        .await
        .map_err(|source| Error::DirectoryCreateFailed {
            path: directory.to_path_buf(),
            source,
        })?;

    if metadata.permissions().readonly() || !writable_by_process(directory) {
        return Err(Error::DirectoryNotWritable {
            path: directory.to_path_buf(),
        });
    }

    Ok(())
}

/// Whether this process may create entries in `directory`, judged by the
/// kernel for the effective user.
#[cfg(unix)]
fn writable_by_process(directory: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(directory.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is NUL-terminated and outlives the call.
    let rc = unsafe {
        libc::faccessat(
            libc::AT_FDCWD,
            c_path.as_ptr(),
            libc::W_OK | libc::X_OK,
            libc::AT_EACCESS,
        )
    };
    rc == 0
}

#[cfg(not(unix))]
fn writable_by_process(_directory: &Path) -> bool {
    true
}

/// The final location of a pulled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    /// Existing, writable directory.
    pub absolute_directory: PathBuf,
    /// Name allocated inside that directory.
    pub filename: String,
    /// `absolute_directory` joined with `filename`.
    pub absolute_file_path: PathBuf,
}

impl ResolvedDestination {
    /// Creates a destination for `filename` inside `directory`.
    pub fn new(directory: &Path, filename: &str) -> Self {
        Self {
            absolute_directory: directory.to_path_buf(),
            filename: filename.to_string(),
            absolute_file_path: directory.join(filename),
        }
    }

    /// Get the directory with a trailing separator, for reporting.
    pub fn directory_display(&self) -> String {
        with_trailing_separator(&self.absolute_directory)
    }
}

/// A storage directory offered to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationChoice {
    /// Value to pass back as the directory token.
    pub absolute: PathBuf,
    /// Path relative to the application root, for display.
    pub relative: String,
}

/// List the `candidates` that currently exist as directories.
pub async fn existing_destinations(root: &Path, candidates: &[PathBuf]) -> Vec<DestinationChoice> {
    let mut choices = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let is_dir = fs::metadata(candidate)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        let relative = candidate
            .strip_prefix(root)
            .unwrap_or(candidate)
            .display()
            .to_string();
        choices.push(DestinationChoice {
            absolute: candidate.clone(),
            relative,
        });
    }
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn resolver(root: &Path) -> PathResolver {
        PathResolver::new(root, root.join("backups"))
    }

    #[test]
    fn test_plan_default_uses_backup_directory() {
        let resolver = PathResolver::new("/site", "/site/backups");
        assert_eq!(
            resolver.plan(&DirectoryToken::Default).unwrap(),
            PathBuf::from("/site/backups")
        );
    }

    #[test]
    fn test_plan_custom_strips_separators() {
        let resolver = PathResolver::new("/site", "/site/backups");
        let token = DirectoryToken::Custom("/wp-content/imports/".into());
        assert_eq!(
            resolver.plan(&token).unwrap(),
            PathBuf::from("/site/wp-content/imports")
        );
    }

    #[test]
    fn test_plan_custom_requires_path() {
        let resolver = PathResolver::new("/site", "/site/backups");
        let err = resolver
            .plan(&DirectoryToken::Custom("  ".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCustomPath);
    }

    #[test]
    fn test_plan_custom_rejects_traversal() {
        let resolver = PathResolver::new("/site", "/site/backups");
        for custom in ["../../etc", "uploads/../../etc", "..", "a\\..\\b", "x/ .. /y"] {
            let err = resolver
                .plan(&DirectoryToken::Custom(custom.into()))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsafePath, "custom: {:?}", custom);
        }
    }

    #[test]
    fn test_plan_custom_requires_absolute_root() {
        let resolver = PathResolver::new("", "backups");
        let err = resolver
            .plan(&DirectoryToken::Custom("uploads".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsafePath);
    }

    #[test]
    fn test_plan_custom_allows_dots_inside_names() {
        let resolver = PathResolver::new("/site", "/site/backups");
        let token = DirectoryToken::Custom("releases/v1..2".into());
        assert_eq!(
            resolver.plan(&token).unwrap(),
            PathBuf::from("/site/releases/v1..2")
        );
    }

    #[test]
    fn test_plan_path_must_be_absolute() {
        let resolver = PathResolver::new("/site", "/site/backups");
        let err = resolver
            .plan(&DirectoryToken::Path("relative/dir".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsafePath);

        let err = resolver
            .plan(&DirectoryToken::Path("/site/../etc".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsafePath);
    }

    #[test]
    fn test_plan_path_is_normalized() {
        let resolver = PathResolver::new("/site", "/site/backups");
        assert_eq!(
            resolver
                .plan(&DirectoryToken::Path("/srv//dumps/./".into()))
                .unwrap(),
            PathBuf::from("/srv/dumps")
        );
    }

    #[test]
    fn test_with_trailing_separator() {
        let sep = MAIN_SEPARATOR;
        assert_eq!(
            with_trailing_separator(Path::new("/srv/backups")),
            format!("/srv/backups{sep}")
        );
        assert_eq!(
            with_trailing_separator(Path::new("/srv/backups///")),
            format!("/srv/backups{sep}")
        );
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = resolver(temp.path());

        let dir = resolver
            .resolve(&DirectoryToken::Custom("a/b/c".into()))
            .await
            .unwrap();

        assert_eq!(dir, temp.path().join("a/b/c"));
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = resolver(temp.path());
        let token = DirectoryToken::Path(temp.path().join("dumps"));

        let first = resolver.resolve(&token).await.unwrap();
        let before = std::fs::metadata(temp.path()).unwrap().modified().unwrap();
        let second = resolver.resolve(&token).await.unwrap();
        let after = std::fs::metadata(temp.path()).unwrap().modified().unwrap();

        assert_eq!(first, second);
        assert_eq!(before, after);
        assert_eq!(std::fs::read_dir(&first).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_traversal_creates_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = resolver(temp.path());

        let err = resolver
            .resolve(&DirectoryToken::Custom("inner/../../escape".into()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsafePath);
        assert!(!temp.path().join("inner").exists());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_fails_when_path_is_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = resolver(temp.path())
            .resolve(&DirectoryToken::Path(blocker.clone()))
            .await
            .unwrap_err();

        match err {
            Error::DirectoryCreateFailed { path, .. } => assert_eq!(path, blocker),
            other => panic!("expected DirectoryCreateFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let err = resolver(temp.path())
            .resolve(&DirectoryToken::Path(locked.clone()))
            .await
            .unwrap_err();

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(err.kind(), ErrorKind::DirectoryNotWritable);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_directory_writable_only_by_others() {
        use std::os::unix::fs::PermissionsExt;

        // Permission bits never deny the superuser.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let temp = tempfile::tempdir().unwrap();
        let shared = temp.path().join("shared");
        std::fs::create_dir(&shared).unwrap();
        // Write bits are set for group and others, not for the owner.
        std::fs::set_permissions(&shared, std::fs::Permissions::from_mode(0o577)).unwrap();
        assert!(!std::fs::metadata(&shared).unwrap().permissions().readonly());

        let err = resolver(temp.path())
            .resolve(&DirectoryToken::Path(shared.clone()))
            .await
            .unwrap_err();

        std::fs::set_permissions(&shared, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(err.kind(), ErrorKind::DirectoryNotWritable);
    }

    #[tokio::test]
    async fn test_writable_directory_passes_access_check() {
        let temp = tempfile::tempdir().unwrap();
        assert!(writable_by_process(temp.path()));
        assert!(ensure_writable_directory(temp.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_existing_destinations_skips_missing() {
        let temp = tempfile::tempdir().unwrap();
        let uploads = temp.path().join("uploads");
        std::fs::create_dir(&uploads).unwrap();

        let choices =
            existing_destinations(temp.path(), &[temp.path().join("missing"), uploads.clone()])
                .await;

        assert_eq!(
            choices,
            vec![DestinationChoice {
                absolute: uploads,
                relative: "uploads".into(),
            }]
        );
    }
}
