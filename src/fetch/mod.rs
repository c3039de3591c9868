//! Authenticated HTTP access to the statistics provider.
//!
//! Every request carries the API key in the `Authorization` header. Non-success
//! statuses are surfaced as [`FetchError`] and never retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider base URL, e.g. `https://ballchasing.com/api`
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ballchasing.com/api".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("rank-baseline/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client bound to one provider and one credential.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client that authenticates every request with `api_key`.
    pub fn new(config: ClientConfig, api_key: &str) -> Result<Self, FetchError> {
        let mut auth = HeaderValue::from_str(api_key)
            .map_err(|e| FetchError::InvalidCredential(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("rank-baseline")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Build an absolute URL for `path` (which may be empty for the root).
    pub fn url(&self, path: &str) -> Result<Url, FetchError> {
        let raw = if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Send a GET and return the raw response without checking its status.
    pub async fn get_raw(&self, url: Url) -> Result<Response, FetchError> {
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    /// GET `url` and decode the JSON body, failing on any non-success status.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let host = url.host_str().unwrap_or("unknown").to_string();
        let response = self.get_raw(url).await?;
        let response = check_status(response, &host)?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turn a non-success response into a [`FetchError`].
fn check_status(response: Response, host: &str) -> Result<Response, FetchError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        return Err(FetchError::RateLimited {
            host: host.to_string(),
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    Ok(response)
}
