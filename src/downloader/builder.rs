//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use puller::downloader::DownloaderBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> puller::Result<()> {
//! let downloader = DownloaderBuilder::new()
//!     .application_root("/var/www/site")
//!     .timeout(Duration::from_secs(120))
//!     .site_url("https://site.example")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::error::Result;
use crate::http::{HttpTransport, Transport};
use crate::progress::Progress;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main() -> puller::Result<()> {
/// use puller::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().application_root("/srv/site").build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Sets the root custom directory paths are joined to.
    pub fn application_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.application_root = root.into();
        self
    }

    /// Sets the directory used when no directory token is given.
    pub fn backup_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.backup_directory = Some(directory.into());
        self
    }

    /// Sets the directories offered to the operator.
    pub fn candidate_directories(mut self, directories: Vec<PathBuf>) -> Self {
        self.config.candidate_directories = Some(directories);
        self
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout = timeout;
        self
    }

    /// Set the maximum number of redirects followed.
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.http.max_redirects = max_redirects;
        self
    }

    /// Replace the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.http.user_agent = user_agent.into();
        self
    }

    /// Append the URL of the hosting site to the `User-Agent`, the way the
    /// host identifies itself to remote servers.
    pub fn site_url(mut self, site_url: &str) -> Self {
        let agent = format!("{}; {}", self.config.http.user_agent, site_url);
        self.config.http.user_agent = agent;
        self
    }

    /// Replace the `Accept` header value.
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.config.http.accept = accept.into();
        self
    }

    /// Skip TLS certificate verification.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.http.accept_invalid_certs = accept;
        self
    }

    /// Exempt `host` from the non-routable address filter.
    pub fn trusted_host(mut self, host: impl Into<String>) -> Self {
        self.config.http.trusted_hosts.push(host.into());
        self
    }

    /// Connect to `ip` whenever `host` is requested, instead of asking DNS.
    ///
    /// The address is still subject to the non-routable filter.
    pub fn pin_host(mut self, host: impl Into<String>, ip: IpAddr) -> Self {
        self.config.http.pinned_hosts.push((host.into(), ip));
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.http.proxy = Some(proxy);
        self
    }

    /// Add the http header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.config
            .http
            .headers
            .get_or_insert_with(HeaderMap::new)
            .insert(name, value);
        self
    }

    /// Set callback for each chunk written to disk.
    ///
    /// # Example
    ///
    /// ```rust
    /// use puller::downloader::DownloaderBuilder;
    ///
    /// let builder = DownloaderBuilder::new().on_progress(|progress| {
    ///     eprintln!("{} bytes", progress.downloaded);
    /// });
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.config.on_progress = Some(Arc::new(callback));
        self
    }

    /// Get the configuration built so far.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Create the [`Downloader`] backed by the reqwest transport.
    pub fn build(self) -> Result<Downloader> {
        let transport = HttpTransport::new(self.config.http.clone())?;
        Ok(Downloader::new(self.config, transport))
    }

    /// Create the [`Downloader`] with a custom transport.
    ///
    /// The HTTP policy in the configuration is left to `transport`.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Downloader<T> {
        Downloader::new(self.config, transport)
    }
}
