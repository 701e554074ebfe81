//! Modrinth API client error types.

use std::sync::Arc;

/// Errors from the Modrinth API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModrinthError {
    /// Base URL could not be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Slug was empty after trimming.
    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),

    /// No project with this slug.
    #[error("project not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response body exceeded the configured limit.
    #[error("response body larger than {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Response parsed but lacks data we rely on.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ModrinthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ModrinthError::Timeout } else { ModrinthError::Network(Arc::new(err)) }
    }
}
