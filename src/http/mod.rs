//! HTTP module containing the fetch side of a pull.
//!
//! - [`client`] - reqwest client creation: timeout, redirect, TLS and header policy
//! - [`host_policy`] - refusal of loopback, private and link-local targets
//! - [`resolver`] - DNS resolution dropping non-routable addresses
//! - [`transport`] - the [`Transport`] seam and its reqwest implementation
//!
//! # Examples
//!
//! ```rust
//! use puller::http::{HttpClientConfig, HttpTransport};
//!
//! # fn example() -> puller::Result<()> {
//! let transport = HttpTransport::new(HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod host_policy;
pub mod resolver;
pub mod transport;

pub use client::{create_http_client, HttpClientConfig};
pub use host_policy::HostPolicy;
pub use resolver::SafeResolver;
pub use transport::{BodyStream, HttpTransport, Transport, TransportResponse};
