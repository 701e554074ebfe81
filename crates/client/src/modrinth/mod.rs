//! Modrinth API client.
//!
//! Read-only access to the two endpoints amble needs:
//!
//! - **Project summary**: `GET {base}/project/{slug}` (downloads, icon,
//!   embedded version ids)
//! - **Version list**: `GET {base}/project/{slug}/version`
//!
//! No authentication. Slugs are percent-encoded as a single path segment.

pub mod error;
pub mod response;

pub use error::ModrinthError;
pub use response::{Project, Version, newest_label, sort_newest_first};

use amble_core::AppConfig;
use reqwest::header;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the Modrinth v2 API.
const DEFAULT_BASE_URL: &str = "https://api.modrinth.com/v2";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "amble/0.1";

/// Largest response body read before giving up (4 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Modrinth client configuration.
#[derive(Debug, Clone)]
pub struct ModrinthConfig {
    /// Base URL (default: https://api.modrinth.com/v2).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: amble/0.1).
    pub user_agent: String,
    /// Response body limit in bytes (default: 4 MiB).
    pub max_body_bytes: usize,
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl From<&AppConfig> for ModrinthConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            ..Self::default()
        }
    }
}

/// Modrinth API client.
#[derive(Debug, Clone)]
pub struct ModrinthClient {
    http: reqwest::Client,
    base: Url,
    config: ModrinthConfig,
}

impl ModrinthClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ModrinthConfig) -> Result<Self, ModrinthError> {
        let base = Url::parse(&config.base_url).map_err(|e| ModrinthError::InvalidBaseUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ModrinthError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ModrinthError::Network(Arc::new(e)))?;

        Ok(Self { http, base, config })
    }

    /// URL of `project/{slug}` followed by `tail` segments.
    pub fn project_url(&self, slug: &str, tail: &[&str]) -> Result<Url, ModrinthError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ModrinthError::InvalidSlug(slug.to_string()));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ModrinthError::InvalidBaseUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .push("project")
            .push(slug)
            .extend(tail);
        Ok(url)
    }

    /// Fetch the project summary for `slug`.
    pub async fn project(&self, slug: &str) -> Result<Project, ModrinthError> {
        let url = self.project_url(slug, &[])?;
        self.get_json(url, slug).await
    }

    /// Fetch every published version of `slug`, in API order.
    pub async fn versions(&self, slug: &str) -> Result<Vec<Version>, ModrinthError> {
        let url = self.project_url(slug, &["version"])?;
        self.get_json(url, slug).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, slug: &str) -> Result<T, ModrinthError> {
        let start = Instant::now();
        tracing::debug!(%url, "requesting Modrinth API");

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "Modrinth API response");

        if status == StatusCode::NOT_FOUND {
            return Err(ModrinthError::NotFound(slug.to_string()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ModrinthError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ModrinthError::HttpError { status: status.as_u16() });
        }

        let bytes = read_capped(response, self.config.max_body_bytes).await?;
        let parsed = serde_json::from_slice(&bytes).map_err(|e| ModrinthError::Parse(e.to_string()))?;

        tracing::debug!(%url, elapsed = ?start.elapsed(), bytes = bytes.len(), "Modrinth API request completed");

        Ok(parsed)
    }
}

/// Read a body, failing once it grows past `limit` bytes.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ModrinthError> {
    if let Some(len) = response.content_length()
        && len > limit as u64
    {
        return Err(ModrinthError::BodyTooLarge { limit });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(ModrinthError::BodyTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
