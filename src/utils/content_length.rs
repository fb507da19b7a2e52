//! Content length extraction utilities.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};

/// Extract the `Content-Length` advertised in `headers`.
///
/// Returns `None` if the header is missing or its value is not an u64, in
/// which case no size check can be made.
///
/// # Example
///
/// ```rust
/// use puller::utils::advertised_length;
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("2048"));
/// assert_eq!(advertised_length(&headers), Some(2048));
/// ```
pub fn advertised_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_advertised_length() {
        assert_eq!(advertised_length(&headers_with("1048576")), Some(1_048_576));
        assert_eq!(advertised_length(&headers_with(" 0 ")), Some(0));
        assert_eq!(
            advertised_length(&headers_with("999999999999")),
            Some(999_999_999_999)
        );
    }

    #[test]
    fn test_advertised_length_invalid() {
        assert_eq!(advertised_length(&HeaderMap::new()), None);
        assert_eq!(advertised_length(&headers_with("abc")), None);
        assert_eq!(advertised_length(&headers_with("-1")), None);
        assert_eq!(advertised_length(&headers_with("")), None);
    }
}
