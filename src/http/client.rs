//! HTTP client setup and middleware configuration.
//!
//! This module builds the reqwest client used for pulls: a total request
//! timeout, a bounded redirect policy that refuses non-routable hops, a
//! resolver that never connects to non-routable addresses, TLS
//! verification, identifying default headers, and request tracing. Failed
//! requests are never retried; the caller decides whether to resubmit.
//!
//! # Examples
//!
//! ```rust
//! use puller::http::{create_http_client, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig {
//!     timeout: Duration::from_secs(60),
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use super::host_policy::HostPolicy;
use super::resolver::SafeResolver;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Total time allowed for one pull, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
/// Redirect hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
/// Media type advertised in the `Accept` header.
pub const DEFAULT_ACCEPT: &str = "application/octet-stream";

/// Default `User-Agent`: `puller/<version>`.
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Too many redirect hops.
#[derive(thiserror::Error, Debug)]
#[error("too many redirects (limit is {limit})")]
pub struct TooManyRedirects {
    /// The configured limit.
    pub limit: usize,
}

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total request timeout, body included.
    pub timeout: Duration,
    /// Maximum number of redirects followed.
    pub max_redirects: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Accept` header value.
    pub accept: String,
    /// Skip TLS certificate verification. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
    /// Hosts exempt from the non-routable address filter.
    pub trusted_hosts: Vec<String>,
    /// Fixed addresses for hosts, used instead of DNS. Still filtered.
    pub pinned_hosts: Vec<(String, IpAddr)>,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Extra default headers to include with all requests.
    pub headers: Option<HeaderMap>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: default_user_agent(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_invalid_certs: false,
            trusted_hosts: Vec::new(),
            pinned_hosts: Vec::new(),
            proxy: None,
            headers: None,
        }
    }
}

/// Build the redirect policy: at most `limit` hops, none to unsafe literal
/// hosts. Named hosts are filtered when they are resolved.
pub fn redirect_policy(limit: usize, hosts: HostPolicy) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > limit {
            return attempt.error(TooManyRedirects { limit });
        }
        match hosts.check_literal(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(target) => attempt.error(target),
        }
    })
}

/// Creates an HTTP client with middleware configuration.
///
/// The inner reqwest client carries the timeout, redirect and TLS policy and
/// the default headers; the middleware stack adds request tracing.
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let hosts = HostPolicy::new(&config.trusted_hosts);
    let resolver = SafeResolver::new(hosts.clone()).with_pinned(config.pinned_hosts);

    let mut headers = config.headers.unwrap_or_default();
    if let Ok(accept) = HeaderValue::from_str(&config.accept) {
        headers.insert(ACCEPT, accept);
    }

    let mut inner_client_builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .redirect(redirect_policy(config.max_redirects, hosts))
        .dns_resolver(Arc::new(resolver))
        .user_agent(config.user_agent)
        .default_headers(headers)
        .danger_accept_invalid_certs(config.accept_invalid_certs);

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}
