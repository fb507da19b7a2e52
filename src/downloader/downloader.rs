//! Core pull implementation.
//!
//! [`Downloader::download_remote_file`] runs one request through the whole
//! pipeline: URL validation, directory resolution, filename allocation,
//! streaming fetch, verification and reporting. The first failing stage
//! short-circuits to a failed [`DownloadOutcome`]; no later stage runs.
//!
//! # Examples
//!
//! ```rust,no_run
//! use puller::downloader::DownloaderBuilder;
//!
//! # async fn example() -> puller::Result<()> {
//! let downloader = DownloaderBuilder::new().application_root("/var/www/site").build()?;
//! let outcome = downloader
//!     .download("https://example.com/site-backup.wpress", "", None)
//!     .await;
//!
//! if outcome.succeeded {
//!     println!("saved to {}", outcome.filepath.unwrap_or_default());
//! } else {
//!     eprintln!("{}: {:#?}", outcome.message, outcome.debug);
//! }
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use crate::download::url::{base_filename, validate_url};
use crate::download::{DebugInfo, DownloadOutcome, DownloadRequest};
use crate::error::{Error, Result};
use crate::http::{HttpTransport, Transport};
use crate::progress::Progress;
use crate::storage::path::with_trailing_separator;
use crate::storage::{
    allocate, existing_destinations, verify_download, DestinationChoice, PathResolver,
    ResolvedDestination,
};
use crate::utils::advertised_length;

use futures::StreamExt;
use reqwest::{StatusCode, Url};
use std::fmt;
use tokio::{fs, fs::File, io::AsyncWriteExt};
use tracing::{debug, info, warn};

/// Represents the pull controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main() -> puller::Result<()> {
/// use puller::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build()?;
/// # Ok(())
/// # }
/// ```
pub struct Downloader<T = HttpTransport> {
    config: DownloaderConfig,
    resolver: PathResolver,
    transport: T,
}

impl<T> fmt::Debug for Downloader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Downloader<T> {
    /// Creates a new Downloader with the given configuration and transport.
    pub(crate) fn new(config: DownloaderConfig, transport: T) -> Self {
        let resolver = PathResolver::new(&config.application_root, config.backup_directory());
        Self {
            config,
            resolver,
            transport,
        }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Gets the directory resolver.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Gets the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists the configured storage directories that currently exist.
    pub async fn candidate_destinations(&self) -> Vec<DestinationChoice> {
        existing_destinations(
            self.resolver.application_root(),
            &self.config.candidate_directories(),
        )
        .await
    }

    /// Pulls `source_url` into the directory selected by `directory_token`
    /// (and `custom_path` when the token is `custom`).
    pub async fn download(
        &self,
        source_url: &str,
        directory_token: &str,
        custom_path: Option<&str>,
    ) -> DownloadOutcome {
        let request = DownloadRequest::new(source_url, directory_token, custom_path);
        self.download_remote_file(&request).await
    }

    /// Runs the whole pipeline for `request`. Never fails: every error is
    /// reported in the returned outcome along with the debug context
    /// gathered up to that point.
    pub async fn download_remote_file(&self, request: &DownloadRequest) -> DownloadOutcome {
        let mut debug_info = DebugInfo::new(request.source_url());

        match self.pull(request, &mut debug_info).await {
            Ok(destination) => {
                info!(
                    url = request.source_url(),
                    file = %destination.absolute_file_path.display(),
                    "Download completed"
                );
                DownloadOutcome::success(&destination, debug_info)
            }
            Err(e) => {
                warn!(url = request.source_url(), kind = ?e.kind(), "Download failed: {}", e);
                DownloadOutcome::failure(&e, debug_info)
            }
        }
    }

    /// Runs [`Self::download_remote_file`] to completion on a private
    /// current-thread runtime, for synchronous callers.
    ///
    /// Must not be called from within an async runtime.
    pub fn download_blocking(&self, request: &DownloadRequest) -> std::io::Result<DownloadOutcome> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.download_remote_file(request)))
    }

    async fn pull(
        &self,
        request: &DownloadRequest,
        debug_info: &mut DebugInfo,
    ) -> Result<ResolvedDestination> {
        let url = validate_url(request.source_url())?;

        let directory = self.resolver.resolve(request.directory()).await?;
        debug_info.set_directory(&with_trailing_separator(&directory));

        let (destination, file) = allocate(&directory, &base_filename(&url)).await?;
        debug_info.set_destination(&destination);

        if let Err(e) = self.fetch(&url, file, &destination, debug_info).await {
            // Leave nothing behind that could pass for the payload.
            debug!(file = %destination.absolute_file_path.display(), "Removing partial file");
            if let Err(remove) = fs::remove_file(&destination.absolute_file_path).await {
                warn!(
                    file = %destination.absolute_file_path.display(),
                    "Failed to remove partial file: {}", remove
                );
            }
            return Err(e);
        }

        Ok(destination)
    }

    /// Streams the response body for `url` into `file`, then verifies it.
    async fn fetch(
        &self,
        url: &Url,
        mut file: File,
        destination: &ResolvedDestination,
        debug_info: &mut DebugInfo,
    ) -> Result<()> {
        let response = self.transport.get(url).await?;
        debug_info.set_response(response.status, response.reason.as_deref(), &response.headers);

        if response.status != StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                code: response.status.as_u16(),
            });
        }

        let expected = advertised_length(&response.headers);
        let write_failed = |source| Error::FileNotAccessible {
            path: destination.absolute_file_path.clone(),
            source,
        };

        // Download the file chunk by chunk.
        debug!("Retrieving chunks...");
        let mut written: u64 = 0;
        let mut body = response.body;
        while let Some(item) = body.next().await {
            let mut chunk = item?;
            written += chunk.len() as u64;
            file.write_all_buf(&mut chunk).await.map_err(write_failed)?;

            if let Some(ref callback) = self.config.on_progress {
                callback(Progress {
                    downloaded: written,
                    total: expected,
                });
            }
        }
        file.flush().await.map_err(write_failed)?;
        drop(file);

        verify_download(&destination.absolute_file_path, expected).await?;
        debug!(bytes = written, "Verified download");
        Ok(())
    }
}
