//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building an HTTP client with the configured user agent and timeout
//! - GET requests for listing and detail pages
//! - Classifying failures so the retry wrapper can decide what to do

use crate::config::Config;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;

/// Source of page markup
///
/// The crawl loop only ever asks for the body of a URL. Tests substitute a
/// scripted implementation; production uses [`HttpFetcher`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns its body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The harvester configuration (user agent and request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use tabelog_harvest::config::Config;
/// use tabelog_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.crawler.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::InvalidRequest {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_body() || error.is_decode() {
        FetchError::Body {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        // Connection refused, DNS, TLS, redirect trouble
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
