//! The transport seam.
//!
//! The core operation only needs "GET this URL and give me the status, the
//! headers and a body stream". [`Transport`] captures exactly that so the
//! reqwest-backed [`HttpTransport`] can be swapped for an in-memory one in
//! tests.

use super::client::{create_http_client, HttpClientConfig};
use super::host_policy::HostPolicy;
use crate::error::{Error, Result};

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Body of a response, delivered chunk by chunk.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Status line, headers and body of the terminal response.
pub struct TransportResponse {
    /// Terminal status code, after redirects.
    pub status: StatusCode,
    /// Reason phrase, when the transport knows a better one than the canonical.
    pub reason: Option<String>,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: BodyStream,
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Something able to GET a URL.
pub trait Transport: Send + Sync {
    /// Send a GET for `url` and return once the response head has arrived.
    fn get(&self, url: &Url) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// [`Transport`] backed by reqwest, with the hardened fetch policy.
#[derive(Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
    hosts: HostPolicy,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("hosts", &self.hosts)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport from the given client configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let hosts = HostPolicy::new(&config.trusted_hosts);
        let client = create_http_client(config).map_err(Error::transport)?;
        Ok(Self { client, hosts })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        self.hosts.check_literal(url).map_err(Error::transport)?;

        debug!("Fetching {}", url);
        let res = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(Error::transport)?;

        Ok(TransportResponse {
            status: res.status(),
            reason: None,
            headers: res.headers().clone(),
            body: Box::pin(res.bytes_stream().map(|chunk| chunk.map_err(Error::transport))),
        })
    }
}
