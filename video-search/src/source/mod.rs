//! Source module for the video search service.
//!
//! Reads the complete list of videos from the content store.

mod envelope;
mod http_fetcher;

pub use envelope::parse_envelope;
pub use http_fetcher::HttpSourceFetcher;

use async_trait::async_trait;
use thiserror::Error;
use video_search_shared::VideoRecord;

/// Errors from reading the content store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network failure, timeout, or a non-success status from the content store.
    #[error("Source unreachable: {0}")]
    SourceUnreachable(String),

    /// The response did not have the expected `{ data: { videos: [...] } }` shape.
    #[error("Source malformed: {0}")]
    SourceMalformed(String),
}

impl SourceError {
    /// Create a source unreachable error.
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::SourceUnreachable(msg.into())
    }

    /// Create a source malformed error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::SourceMalformed(msg.into())
    }
}

/// Trait for fetching every record from the content store.
///
/// Implementations are stateless and perform no retries; a failed fetch is
/// retried by the next sync cycle.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch the full current set of videos.
    ///
    /// An empty or absent collection is `Ok(vec![])`, not an error.
    async fn fetch_all(&self) -> Result<Vec<VideoRecord>, SourceError>;
}
