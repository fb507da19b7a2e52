//! Caller input for one pull.
//!
//! A [`DownloadRequest`] is the strongly-typed boundary between the host and
//! the core operation: the raw form fields are trimmed and the directory
//! token is classified once, here, before any stage looks at them.
//!
//! ```rust
//! use puller::download::{DirectoryToken, DownloadRequest};
//!
//! let request = DownloadRequest::new(" https://example.com/a.txt ", "custom", Some("wp-content/x"));
//! assert_eq!(request.source_url(), "https://example.com/a.txt");
//! assert_eq!(request.directory(), &DirectoryToken::Custom("wp-content/x".into()));
//! ```

use std::path::PathBuf;

/// Literal token selecting a path relative to the application root.
pub const CUSTOM_TOKEN: &str = "custom";

/// Where the caller wants the file stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryToken {
    /// No directory given: use the configured backup directory.
    Default,
    /// The `custom` marker with the accompanying relative path, possibly empty.
    Custom(String),
    /// A directory path given verbatim.
    Path(PathBuf),
}

impl DirectoryToken {
    /// Classify a raw token and its optional custom path.
    pub fn parse(token: &str, custom_path: Option<&str>) -> Self {
        match token.trim() {
            "" => DirectoryToken::Default,
            CUSTOM_TOKEN => {
                DirectoryToken::Custom(custom_path.map(str::trim).unwrap_or_default().to_string())
            }
            other => DirectoryToken::Path(PathBuf::from(other)),
        }
    }
}

/// Represents a single request to pull a remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    source_url: String,
    directory: DirectoryToken,
}

impl DownloadRequest {
    /// Creates a new [`DownloadRequest`] from raw caller fields.
    pub fn new(source_url: &str, directory_token: &str, custom_path: Option<&str>) -> Self {
        Self {
            source_url: source_url.trim().to_string(),
            directory: DirectoryToken::parse(directory_token, custom_path),
        }
    }

    /// Creates a request targeting the default backup directory.
    pub fn to_default_directory(source_url: &str) -> Self {
        Self::new(source_url, "", None)
    }

    /// Get the source URL, trimmed but otherwise unvalidated.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Get the directory selection.
    pub fn directory(&self) -> &DirectoryToken {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_default() {
        assert_eq!(DirectoryToken::parse("", None), DirectoryToken::Default);
        assert_eq!(DirectoryToken::parse("   ", Some("ignored")), DirectoryToken::Default);
    }

    #[test]
    fn test_custom_token_keeps_path() {
        assert_eq!(
            DirectoryToken::parse("custom", Some(" wp-content/files ")),
            DirectoryToken::Custom("wp-content/files".into())
        );
        assert_eq!(
            DirectoryToken::parse("custom", None),
            DirectoryToken::Custom(String::new())
        );
    }

    #[test]
    fn test_other_token_is_path() {
        assert_eq!(
            DirectoryToken::parse("/srv/backups", None),
            DirectoryToken::Path(PathBuf::from("/srv/backups"))
        );
    }

    #[test]
    fn test_request_trims_url() {
        let request = DownloadRequest::to_default_directory("\thttps://example.com/a.txt\n");
        assert_eq!(request.source_url(), "https://example.com/a.txt");
        assert_eq!(request.directory(), &DirectoryToken::Default);
    }
}
