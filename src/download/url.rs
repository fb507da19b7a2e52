//! URL validation and filename derivation.
//!
//! Validation is pure: it only parses the string and never touches the
//! network, so malformed input is rejected before any I/O happens.
//!
//! ```rust
//! use puller::download::url::{base_filename, validate_url};
//!
//! let url = validate_url("https://example.com/files/report.zip?sig=abc")?;
//! assert_eq!(base_filename(&url), "report.zip");
//! assert!(validate_url("not-a-url").is_err());
//! # Ok::<(), puller::Error>(())
//! ```

use crate::error::{Error, Result};

use percent_encoding::percent_decode_str;
use reqwest::Url;

/// Name used when the URL has no usable last path segment.
pub const FALLBACK_FILENAME: &str = "download";

/// Check that `value` is a well-formed, fetchable HTTP(S) URL.
pub fn validate_url(value: &str) -> Result<Url> {
    let invalid = |reason: String| Error::InvalidUrl {
        url: value.to_string(),
        reason,
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("the URL is empty".into()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| invalid(format!("the url \"{}\" cannot be parsed: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => (),
        other => return Err(invalid(format!("unsupported scheme \"{}\"", other))),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid(format!("the url \"{}\" has no host", trimmed))),
    }
}

/// Derive the candidate filename from the last path segment of `url`.
///
/// The segment is percent-decoded and stripped of anything that could
/// address another directory. The query string never takes part.
pub fn base_filename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .map(|decoded| sanitize_filename(&decoded))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();

    // Leading dots would produce hidden files or `..`.
    cleaned.trim().trim_start_matches('.').to_string()
}
