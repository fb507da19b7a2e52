//! Downloader module containing the core operation, its builder and configuration.
//!
//! - `downloader` - [`Downloader`], which runs a request through the pipeline
//! - `builder` - [`DownloaderBuilder`] for configuration using the builder pattern
//! - `config` - [`DownloaderConfig`] and its defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use puller::downloader::DownloaderBuilder;
//! use puller::download::DownloadRequest;
//!
//! # async fn example() -> puller::Result<()> {
//! let downloader = DownloaderBuilder::new()
//!     .application_root("/var/www/site")
//!     .build()?;
//!
//! let request = DownloadRequest::new("https://example.com/a.txt", "custom", Some("wp-content/imports"));
//! let outcome = downloader.download_remote_file(&request).await;
//! println!("{}", outcome.to_envelope());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;

pub use builder::DownloaderBuilder;
pub use config::DownloaderConfig;
pub use downloader::Downloader;
