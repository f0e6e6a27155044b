//! HTTP client for the content store's `/videos` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{parse_envelope, SourceError, SourceFetcher};
use video_search_shared::VideoRecord;

/// Production fetcher that lists videos from the content store API.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use video_search::source::{HttpSourceFetcher, SourceFetcher};
///
/// let fetcher = HttpSourceFetcher::new("http://localhost:8000", Duration::from_secs(30))?;
/// let videos = fetcher.fetch_all().await?;
/// ```
pub struct HttpSourceFetcher {
    url: String,
    client: ReqwestClient,
}

impl HttpSourceFetcher {
    /// Create a fetcher for the given API base URL.
    ///
    /// `timeout` bounds the whole request, including reading the body.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::unreachable(e.to_string()))?;

        Ok(Self {
            url: format!("{}/videos", base_url.trim_end_matches('/')),
            client,
        })
    }

    /// The full URL of the list endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_all(&self) -> Result<Vec<VideoRecord>, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::unreachable(format!(
                "content store returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::unreachable(e.to_string()))?;

        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::malformed(format!("invalid JSON: {}", e)))?;

        let records = parse_envelope(payload)?;
        debug!(record_count = records.len(), "Fetched videos from content store");
        Ok(records)
    }
}
