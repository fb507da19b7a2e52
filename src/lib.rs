//! Puller fetches a single remote file over HTTP(S) into a sandboxed local
//! directory, and reports what happened in a structured outcome.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use puller::DownloaderBuilder;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), puller::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .application_root("/var/www/site")
//!     .build()?;
//!
//! // Empty token: store under the backup directory.
//! let outcome = downloader
//!     .download("https://example.com/site-backup.zip", "", None)
//!     .await;
//! println!("{}", outcome.to_envelope());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`download`] - Caller input ([`DownloadRequest`]) and reported result ([`DownloadOutcome`])
//! - [`downloader`] - The [`Downloader`] running the pipeline, and its [`DownloaderBuilder`]
//! - [`error`] - The error taxonomy with the [`Error`] enum
//! - [`http`] - HTTP client policy and the [`Transport`] seam
//! - [`progress`] - Byte-count progress events and their terminal rendering
//! - [`storage`] - Directory resolution, filename allocation and verification
//! - [`utils`] - Shared utility functions

pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod storage;
pub mod utils;

pub use download::{DebugInfo, DirectoryToken, DownloadOutcome, DownloadRequest};
pub use downloader::{Downloader, DownloaderBuilder, DownloaderConfig};
pub use error::{Error, ErrorKind, Result};
pub use http::{HttpClientConfig, HttpTransport, Transport, TransportResponse};
pub use progress::{Progress, ProgressBarOpts, ProgressDisplay};
pub use storage::{DestinationChoice, ResolvedDestination};
