// src/fetch/http.rs
// =============================================================================
// The real `Fetcher`, built on reqwest.
//
// Key functionality:
// - Plain GET with redirects followed (up to a limit)
// - Reads status, Content-Type and the whole body
// - Sorts reqwest errors into the FetchError categories
//
// Rust concepts:
// - async_trait: lets us implement an async method behind a trait object
// - map_err: converts one error type into another before using `?`
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use super::{FetchError, Fetcher, PageResponse};

/// Knobs for the HTTP client.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            redirect_limit: 10,
            user_agent: format!("doc-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetcher backed by a single pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent)
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        // Parse first so an empty or garbled URL gets a clear message
        // instead of reqwest's generic builder error
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(PageResponse {
            url: final_url,
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

// Sorts a reqwest error into one of our categories
//
// reqwest doesn't expose DNS or TLS failures as separate kinds, so for
// those we look at the error text
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();
    let lowered = error_string.to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        if lowered.contains("dns") {
            FetchError::Dns
        } else {
            FetchError::Connect(error_string)
        }
    } else if lowered.contains("certificate") || lowered.contains("ssl") {
        FetchError::Ssl
    } else {
        FetchError::Other(error_string)
    }
}
