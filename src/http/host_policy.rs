//! Refusal of non-routable fetch targets.
//!
//! The operator supplies arbitrary URLs, so the fetch must not be usable to
//! reach loopback, private or link-local services. Literal addresses and
//! `localhost` names are checked here for the initial URL and for every
//! redirect hop. Names are checked at connect time by
//! [`SafeResolver`](super::resolver::SafeResolver). Hosts listed as trusted
//! bypass the filter.

use reqwest::Url;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::warn;

/// A fetch target rejected by the [`HostPolicy`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("refusing to fetch from non-routable host \"{host}\"")]
pub struct UnsafeTarget {
    /// The rejected host.
    pub host: String,
}

/// Decides whether a URL may be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPolicy {
    trusted_hosts: Vec<String>,
}

impl HostPolicy {
    /// Creates a policy exempting `trusted_hosts` (compared case-insensitively).
    pub fn new<I, S>(trusted_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            trusted_hosts: trusted_hosts
                .into_iter()
                .map(|h| normalize_host(h.as_ref()))
                .collect(),
        }
    }

    /// Whether `host` is exempt from the filter.
    pub fn is_trusted(&self, host: &str) -> bool {
        let host = normalize_host(host);
        self.trusted_hosts.iter().any(|trusted| *trusted == host)
    }

    /// Check the literal host of `url`, without DNS.
    pub fn check_literal(&self, url: &Url) -> std::result::Result<(), UnsafeTarget> {
        let host = match url.host_str() {
            Some(host) => host,
            None => {
                return Err(UnsafeTarget {
                    host: String::new(),
                })
            }
        };

        if self.is_trusted(host) {
            return Ok(());
        }

        let bare = normalize_host(host);
        let unsafe_host = match bare.parse::<IpAddr>() {
            Ok(ip) => is_unsafe_ip(ip),
            Err(_) => bare == "localhost" || bare.ends_with(".localhost"),
        };

        if unsafe_host {
            warn!(host = %host, "Rejected non-routable fetch target");
            return Err(UnsafeTarget {
                host: host.to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) fn normalize_host(host: &str) -> String {
    host.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_ascii_lowercase()
}

/// Whether `ip` is loopback, private, link-local or otherwise not publicly routable.
pub fn is_unsafe_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_unsafe_ipv4(v4),
        IpAddr::V6(v6) => is_unsafe_ipv6(v6),
    }
}

fn is_unsafe_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || a == 0
        // 100.64.0.0/10, carrier-grade NAT
        || (a == 100 && (b & 0xc0) == 64)
}

fn is_unsafe_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_unsafe_ipv4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fc00::/7, unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10, link-local
        || (first & 0xffc0) == 0xfe80
        // 2001:db8::/32, documentation
        || (first == 0x2001 && ip.segments()[1] == 0x0db8)
}
