//! Outcome reporting.
//!
//! This module contains the [`DownloadOutcome`] returned by every pull and
//! the [`DebugInfo`] attached to it. Debug context is collected as the
//! pipeline advances, so a failure at any stage still reports everything
//! known up to that point.
//!
//! # Examples
//!
//! ```rust
//! use puller::download::{DebugInfo, DownloadOutcome};
//! use puller::Error;
//!
//! let outcome = DownloadOutcome::failure(
//!     &Error::UnexpectedStatus { code: 404 },
//!     DebugInfo::new("https://example.com/a.txt"),
//! );
//! assert!(!outcome.succeeded);
//! assert_eq!(outcome.message, "Download failed with status code: 404");
//!
//! let envelope = outcome.to_envelope();
//! assert_eq!(envelope["success"], false);
//! assert_eq!(envelope["data"]["debug"]["url"], "https://example.com/a.txt");
//! ```

use crate::error::{Error, ErrorKind};
use crate::storage::ResolvedDestination;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Message reported for a completed pull.
pub const SUCCESS_MESSAGE: &str = "File downloaded successfully";

/// Diagnostic metadata attached to every outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    /// Source URL as supplied by the caller.
    pub url: String,
    /// Destination file, once allocated.
    pub filepath: Option<String>,
    /// Destination directory with a trailing separator, once resolved.
    pub directory: Option<String>,
    /// Terminal HTTP status code, once a response arrived.
    pub response_code: Option<u16>,
    /// Reason phrase of the terminal status.
    pub response_message: Option<String>,
    /// Response headers, lower-cased names, repeated values joined by `", "`.
    pub headers: BTreeMap<String, String>,
}

impl DebugInfo {
    /// Create debug info knowing only the source URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Record the resolved directory.
    pub fn set_directory(&mut self, directory: &str) {
        self.directory = Some(directory.to_string());
    }

    /// Record the allocated destination.
    pub fn set_destination(&mut self, destination: &ResolvedDestination) {
        self.directory = Some(destination.directory_display());
        self.filepath = Some(destination.absolute_file_path.display().to_string());
    }

    /// Record the terminal response status and headers.
    pub fn set_response(&mut self, status: StatusCode, reason: Option<&str>, headers: &HeaderMap) {
        self.response_code = Some(status.as_u16());
        self.response_message = reason
            .or_else(|| status.canonical_reason())
            .map(String::from);
        self.headers = flatten_headers(headers);
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    flat
}

/// Terminal result of one pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    /// Whether the file was fetched and verified.
    pub succeeded: bool,
    /// Human readable message.
    pub message: String,
    /// Stored filename, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Absolute path of the stored file, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    /// Failure tag, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Diagnostic context.
    pub debug: DebugInfo,
}

impl DownloadOutcome {
    /// Create a successful outcome for a verified destination.
    pub fn success(destination: &ResolvedDestination, debug: DebugInfo) -> Self {
        Self {
            succeeded: true,
            message: SUCCESS_MESSAGE.to_string(),
            filename: Some(destination.filename.clone()),
            filepath: Some(destination.absolute_file_path.display().to_string()),
            error: None,
            debug,
        }
    }

    /// Create a failed outcome from the error that stopped the pipeline.
    pub fn failure(error: &Error, debug: DebugInfo) -> Self {
        Self {
            succeeded: false,
            message: error.to_string(),
            filename: None,
            filepath: None,
            error: Some(error.kind()),
            debug,
        }
    }

    /// Get the failure tag, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Wrap the outcome the way the host answers its callers:
    /// `{"success": bool, "data": {...}}`.
    pub fn to_envelope(&self) -> Value {
        let mut data = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Value::Object(ref mut map) = data {
            map.remove("succeeded");
        }
        json!({ "success": self.succeeded, "data": data })
    }
}
