//! DNS resolution for the reqwest client.
//!
//! Every connection the client opens, redirect hops included, resolves its
//! host through [`SafeResolver`]. Non-routable addresses are dropped before
//! reqwest sees them, so the address that is checked is the address that is
//! connected to.

use super::host_policy::{is_unsafe_ip, normalize_host, HostPolicy, UnsafeTarget};
use crate::error::BoxError;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolver refusing non-routable addresses for untrusted hosts.
#[derive(Debug, Clone, Default)]
pub struct SafeResolver {
    hosts: HostPolicy,
    pinned: Arc<HashMap<String, Vec<IpAddr>>>,
}

impl SafeResolver {
    /// Creates a resolver applying `hosts`.
    pub fn new(hosts: HostPolicy) -> Self {
        Self {
            hosts,
            pinned: Arc::default(),
        }
    }

    /// Answer lookups for the pinned hosts from the given addresses instead
    /// of DNS. The answers are still filtered.
    pub fn with_pinned<I, S>(mut self, pinned: I) -> Self
    where
        I: IntoIterator<Item = (S, IpAddr)>,
        S: AsRef<str>,
    {
        let mut map: HashMap<String, Vec<IpAddr>> = HashMap::new();
        for (host, ip) in pinned {
            map.entry(normalize_host(host.as_ref())).or_default().push(ip);
        }
        self.pinned = Arc::new(map);
        self
    }

    /// Resolve `host` and keep only the addresses it may be fetched from.
    pub async fn lookup(&self, host: &str) -> Result<Vec<SocketAddr>, BoxError> {
        let key = normalize_host(host);
        let addrs: Vec<SocketAddr> = match self.pinned.get(&key) {
            Some(ips) => ips.iter().map(|ip| SocketAddr::new(*ip, 0)).collect(),
            None => tokio::net::lookup_host((key.as_str(), 0)).await?.collect(),
        };

        if self.hosts.is_trusted(&key) {
            return Ok(addrs);
        }

        let safe: Vec<SocketAddr> = addrs
            .into_iter()
            .filter(|addr| {
                let refused = is_unsafe_ip(addr.ip());
                if refused {
                    warn!(host = %key, ip = %addr.ip(), "Dropped non-routable address");
                }
                !refused
            })
            .collect();

        if safe.is_empty() {
            return Err(UnsafeTarget { host: key }.into());
        }
        debug!(host = %key, count = safe.len(), "Resolved host");
        Ok(safe)
    }
}

impl Resolve for SafeResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addrs = resolver.lookup(name.as_str()).await?;
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok(addrs)
        })
    }
}
