//! Icon loading as a two-outcome operation.

use async_trait::async_trait;
use std::time::Duration;

/// How an icon load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconOutcome {
    Loaded,
    Failed,
}

/// Loads an icon so it can be shown.
#[async_trait]
pub trait IconLoader: Send + Sync {
    async fn load(&self, uri: &str) -> IconOutcome;
}

/// Loads icons over HTTP: a success status with a non-empty body counts as loaded.
#[derive(Debug, Clone)]
pub struct HttpIconLoader {
    http: reqwest::Client,
}

impl HttpIconLoader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .use_rustls_tls()
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl IconLoader for HttpIconLoader {
    async fn load(&self, uri: &str) -> IconOutcome {
        let url = match url::Url::parse(uri) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                tracing::debug!(uri, "icon reference is not an http(s) URL");
                return IconOutcome::Failed;
            }
        };

        let mut response = match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(uri, status = response.status().as_u16(), "icon request failed");
                return IconOutcome::Failed;
            }
            Err(e) => {
                tracing::debug!(uri, error = %e, "icon request failed");
                return IconOutcome::Failed;
            }
        };

        // First non-empty chunk is enough; the rest is never buffered.
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) if !chunk.is_empty() => return IconOutcome::Loaded,
                Ok(Some(_)) => continue,
                Ok(None) => {
                    tracing::debug!(uri, "icon body was empty");
                    return IconOutcome::Failed;
                }
                Err(e) => {
                    tracing::debug!(uri, error = %e, "icon body could not be read");
                    return IconOutcome::Failed;
                }
            }
        }
    }
}
