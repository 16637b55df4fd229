//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building an HTTP client with the configured header set
//! - GET requests for listing pages
//! - GET requests for record assets such as photos
//! - Error classification into page-level failure kinds
//!
//! Fetch failures are data, not errors: a failed page yields a `PageResult`
//! with no body and the run keeps going.

use crate::config::FetcherConfig;
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// A single page to fetch, carrying its 1-based page number
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: Url,
    pub page: u32,
}

impl PageRequest {
    pub fn new(url: Url, page: u32) -> Self {
        PageRequest { url, page }
    }
}

/// Outcome classification for one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// HTTP 200 with a readable body
    Ok,
    /// Any non-200 status, redirects included
    HttpError(u16),
    /// Connection-level failure: DNS, TCP reset, timeout
    NetworkError,
}

/// Result of fetching one page
#[derive(Debug)]
pub struct PageResult {
    pub url: Url,
    pub page: u32,
    /// Response body, present only when `status` is `Ok`
    pub body: Option<String>,
    pub status: PageStatus,
}

impl PageResult {
    pub fn is_ok(&self) -> bool {
        self.status == PageStatus::Ok
    }
}

/// Builds an HTTP client with the configured header set
///
/// The same client is reused for every page and asset request in a run, so
/// the header set is fixed up front. Servers routinely reject default client
/// identifiers, which makes these headers required configuration.
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScrapeError)` - A header value was malformed or the client could not be built
pub fn build_http_client(config: &FetcherConfig) -> crate::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("accept", &config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", &config.accept_language)?,
    );

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::none()) // Anything but a direct 200 is a failed page
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

/// Fetches listing pages and assets over one shared client
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &FetcherConfig) -> crate::Result<Self> {
        Ok(PageFetcher {
            client: build_http_client(config)?,
        })
    }

    /// Fetches one listing page
    ///
    /// Emits a progress line per attempt. Any non-200 response or transport
    /// failure is classified into the returned status and the body stays
    /// empty; the caller decides what a bodiless page means.
    pub async fn fetch(&self, request: &PageRequest) -> PageResult {
        match self.client.get(request.url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if status != StatusCode::OK {
                    tracing::warn!("Could not fetch {}", request.url);
                    tracing::warn!("Status code: {}", status.as_u16());
                    return PageResult {
                        url: request.url.clone(),
                        page: request.page,
                        body: None,
                        status: PageStatus::HttpError(status.as_u16()),
                    };
                }

                match response.text().await {
                    Ok(body) => {
                        tracing::info!("Fetched {}", request.url);
                        PageResult {
                            url: request.url.clone(),
                            page: request.page,
                            body: Some(body),
                            status: PageStatus::Ok,
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Could not read body of {}: {}", request.url, e);
                        PageResult {
                            url: request.url.clone(),
                            page: request.page,
                            body: None,
                            status: PageStatus::NetworkError,
                        }
                    }
                }
            }
            Err(e) => {
                // Classify error
                let detail = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    "connection failed".to_string()
                } else {
                    e.to_string()
                };
                tracing::warn!("Could not fetch {}: {}", request.url, detail);
                PageResult {
                    url: request.url.clone(),
                    page: request.page,
                    body: None,
                    status: PageStatus::NetworkError,
                }
            }
        }
    }

    /// Fetches one asset, returning its bytes
    ///
    /// Asset failures are record-local: `None` here leaves the owning record
    /// intact, so there is no error to propagate.
    pub async fn fetch_asset(&self, url: &str) -> Option<Vec<u8>> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status != StatusCode::OK {
                    tracing::warn!("Could not fetch asset {}", url);
                    tracing::warn!("Status code: {}", status.as_u16());
                    return None;
                }
                match response.bytes().await {
                    Ok(bytes) => {
                        tracing::info!("Fetched {}", url);
                        Some(bytes.to_vec())
                    }
                    Err(e) => {
                        tracing::warn!("Could not read asset {}: {}", url, e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Could not fetch asset {}: {}", url, e);
                None
            }
        }
    }
}
