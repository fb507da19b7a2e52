//! Download module containing the request/outcome types of a pull.
//!
//! - [`request`] - [`DownloadRequest`] and [`DirectoryToken`], the typed caller input
//! - [`url`] - URL validation and base filename derivation
//! - [`outcome`] - [`DownloadOutcome`] and [`DebugInfo`], the reported result
//!
//! # Examples
//!
//! ```rust
//! use puller::download::{DownloadRequest, url::validate_url};
//!
//! let request = DownloadRequest::new("https://example.com/file.zip", "", None);
//! let url = validate_url(request.source_url())?;
//! assert_eq!(url.host_str(), Some("example.com"));
//! # Ok::<(), puller::Error>(())
//! ```

pub mod outcome;
pub mod request;
pub mod url;

pub use outcome::{DebugInfo, DownloadOutcome};
pub use request::{DirectoryToken, DownloadRequest};
