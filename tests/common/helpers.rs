#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;
use futures::stream;
use puller::{DownloaderBuilder, Error, Transport, TransportResponse};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
use reqwest::{StatusCode, Url};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Common test constants
pub const LOOPBACK: &str = "127.0.0.1";
pub const TEST_USER_AGENT: &str = "puller-test-agent";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create parent directory");
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that nothing exists at the given path
pub fn assert_file_absent(path: &Path) {
    assert!(!path.exists(), "Nothing should exist at path: {:?}", path);
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Lists the file names in `dir`, sorted
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

// === Downloader Builder Helpers ===

/// Creates a downloader builder rooted at `root` that may reach the mock server
pub fn create_test_downloader_builder(root: &Path) -> DownloaderBuilder {
    DownloaderBuilder::new()
        .application_root(root)
        .trusted_host(LOOPBACK)
}

// === Mock Server Helpers ===

/// Starts a mock server serving `content` at `path_str`
pub async fn setup_mock_file(path_str: &str, content: &[u8]) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&mock_server)
        .await;
    mock_server
}

/// Starts a mock server answering `path_str` with `status` and no body
pub async fn setup_mock_status(path_str: &str, status: u16) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(status))
        .mount(&mock_server)
        .await;
    mock_server
}

// === In-memory Transport ===

/// One piece of a scripted response body.
#[derive(Debug, Clone)]
pub enum Chunk {
    Data(Bytes),
    Fail(&'static str),
}

/// A [`Transport`] replaying a scripted response and recording requested URLs.
#[derive(Debug)]
pub struct MockTransport {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub chunks: Vec<Chunk>,
    pub requested: Mutex<Vec<Url>>,
}

impl MockTransport {
    /// A 200 response streaming `chunks`, with no Content-Length.
    pub fn ok(chunks: Vec<Chunk>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            chunks,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// A response with `status` and an empty body.
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::ok(Vec::new())
        }
    }

    /// Advertise `len` as the Content-Length.
    pub fn with_content_length(mut self, len: u64) -> Self {
        self.headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        self
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requested.lock().expect("poisoned").len()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> puller::Result<TransportResponse> {
        self.requested.lock().expect("poisoned").push(url.clone());

        let items: Vec<puller::Result<Bytes>> = self
            .chunks
            .iter()
            .map(|chunk| match chunk {
                Chunk::Data(bytes) => Ok(bytes.clone()),
                Chunk::Fail(reason) => Err(Error::transport(*reason)),
            })
            .collect();

        Ok(TransportResponse {
            status: self.status,
            reason: None,
            headers: self.headers.clone(),
            body: Box::pin(stream::iter(items)),
        })
    }
}

/// Splits `content` into chunks of `size` bytes
pub fn chunked(content: &[u8], size: usize) -> Vec<Chunk> {
    content
        .chunks(size)
        .map(|c| Chunk::Data(Bytes::copy_from_slice(c)))
        .collect()
}
