//! Error handling for the puller library.
//!
//! Every stage of the fetch pipeline returns [`Error`] on failure. The core
//! operation never lets an error escape: it converts the first failure into a
//! failed [`DownloadOutcome`](crate::DownloadOutcome) whose message is the
//! error's `Display` string and whose kind is [`Error::kind`].

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can happen while pulling a remote file.
#[derive(Error, Debug)]
pub enum Error {
    /// The source URL is empty, unparsable, or not fetchable over HTTP(S).
    #[error("Invalid URL format: {reason}")]
    InvalidUrl {
        /// The URL as supplied by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The `custom` directory token was used without a custom path.
    #[error("Please enter a custom directory path")]
    MissingCustomPath,

    /// The requested directory would escape the application root.
    #[error("Invalid directory path: {path}")]
    UnsafePath {
        /// The offending path, as supplied.
        path: String,
    },

    /// The destination directory did not exist and could not be created.
    #[error("Failed to create directory: {}", path.display())]
    DirectoryCreateFailed {
        /// The directory that was attempted.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination directory exists but cannot be written to.
    #[error("Directory is not writable: {}", path.display())]
    DirectoryNotWritable {
        /// The directory that was checked.
        path: PathBuf,
    },

    /// DNS, TLS, timeout, connection or redirect-policy failure, including a
    /// refused non-routable target. Local write failures are
    /// [`Error::FileNotAccessible`].
    #[error("Download failed: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    /// The server answered with a terminal status other than 200.
    #[error("Download failed with status code: {code}")]
    UnexpectedStatus {
        /// The terminal HTTP status code.
        code: u16,
    },

    /// The downloaded file is missing or unreadable.
    #[error("Downloaded file is not accessible")]
    FileNotAccessible {
        /// The file that was checked.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file on disk does not match the advertised `Content-Length`.
    #[error("Downloaded file size does not match expected size (expected {expected} bytes, got {actual})")]
    SizeMismatch {
        /// Bytes advertised by the server.
        expected: u64,
        /// Bytes found on disk.
        actual: u64,
    },
}

impl Error {
    /// Wrap any error as a transport failure.
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Error::Transport {
            source: source.into(),
        }
    }

    /// Get the tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Error::MissingCustomPath => ErrorKind::MissingCustomPath,
            Error::UnsafePath { .. } => ErrorKind::UnsafePath,
            Error::DirectoryCreateFailed { .. } => ErrorKind::DirectoryCreateFailed,
            Error::DirectoryNotWritable { .. } => ErrorKind::DirectoryNotWritable,
            Error::Transport { .. } => ErrorKind::TransportError,
            Error::UnexpectedStatus { code } => ErrorKind::UnexpectedStatus { code: *code },
            Error::FileNotAccessible { .. } => ErrorKind::FileNotAccessible,
            Error::SizeMismatch { expected, actual } => ErrorKind::SizeMismatch {
                expected: *expected,
                actual: *actual,
            },
        }
    }
}

/// Tag of an [`Error`], attached to failed outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ErrorKind {
    InvalidUrl,
    MissingCustomPath,
    UnsafePath,
    DirectoryCreateFailed,
    DirectoryNotWritable,
    TransportError,
    UnexpectedStatus { code: u16 },
    FileNotAccessible,
    SizeMismatch { expected: u64, actual: u64 },
}

/// Result type alias for operations that can fail with a puller error.
pub type Result<T> = std::result::Result<T, Error>;
