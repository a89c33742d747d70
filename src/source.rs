//! Where device payloads come from.
//!
//! `HttpSource` talks to the device API over HTTP. Tests and one-shot tools
//! can plug in any other `DeviceSource`.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Failure to obtain a usable payload.
///
/// All variants end up in the same "failed to load" state on the page; the
/// distinction only exists for logs.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Invalid JSON payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Fetches the raw body for a device API path such as `/api/device/zyxel`.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Device API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Builds a client for `base_url` (e.g. `http://127.0.0.1:5000`).
    ///
    /// Without a timeout the transport defaults apply.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl DeviceSource for HttpSource {
    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        debug!(url = %url, bytes = body.len(), "Fetched device payload");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let source = HttpSource::new("http://127.0.0.1:5000/", None).unwrap();
        assert_eq!(
            source.url_for("/api/device/zyxel"),
            "http://127.0.0.1:5000/api/device/zyxel"
        );
        assert_eq!(source.base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Status(503).to_string(), "HTTP error! status: 503");
    }
}
