//! HTTP client used for sitemap and page fetches
//!
//! This is a thin wrapper over `reqwest` so every fetch in the pipeline
//! reports failures the same way: transport problems and non-2xx statuses
//! both become a [`FetchError`] carrying the URL that failed.

use reqwest::{Client as ReqwestClient, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Error raised when a GET request cannot produce a body
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, decoding or other transport failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Options for the HTTP client
///
/// Both fields default to `None`, which leaves `reqwest`'s own defaults in
/// place: no user agent header and no request timeout.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// User agent header to send with every request
    pub user_agent: Option<String>,

    /// Overall timeout for a single request
    pub timeout: Option<Duration>,
}

impl HttpConfig {
    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client for fetching sitemaps and pages
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            client: ReqwestClient::new(),
        }
    }
}

impl HttpClient {
    /// Create a client with library defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client from explicit options
    pub fn with_config(config: &HttpConfig) -> Result<Self, FetchError> {
        let mut builder = ReqwestClient::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// GET a URL and return the body as text
    #[instrument(skip(self), level = "debug")]
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("Sending GET request to {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("GET {} failed with status {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}
