// src/fetch/mod.rs
// =============================================================================
// This module is the crawler's only door to the network.
//
// Submodules:
// - http: the reqwest-backed implementation used by the real binary
//
// The crawl loop and the downloader never talk to reqwest directly. They hold
// a `dyn Fetcher`, which lets the tests swap in an in-memory site.
//
// Contract of a fetch:
// - Any HTTP status (200, 404, 500...) is a *response*, not an error
// - Only transport failures (DNS, refused connection, TLS, timeout,
//   redirect loop) come back as `FetchError`
// =============================================================================

mod http;

pub use http::{FetchSettings, HttpFetcher};

use async_trait::async_trait;
use thiserror::Error;

/// Everything the crawler needs to know about one fetched URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// URL after redirects
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl PageResponse {
    /// True for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8; invalid sequences become U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failures, categorized the same way for every caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname")]
    Dns,
    #[error("SSL certificate error")]
    Ssl,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

/// Something that can GET a URL.
///
/// `Send + Sync` so a single fetcher can be shared (behind an `Arc`) by the
/// crawl loop and the downloader.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> PageResponse {
        PageResponse {
            url: "https://example.com/".to_string(),
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    #[test]
    fn test_success_range() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
        assert!(!response(500).is_success());
    }

    #[test]
    fn test_text_is_lossy() {
        let mut page = response(200);
        page.body = vec![b'o', b'k', 0xff];
        assert_eq!(page.text(), "ok\u{fffd}");
    }
}
