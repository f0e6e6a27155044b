//! Error types for sync cycles.

use thiserror::Error;

use crate::source::SourceError;
use video_search_repository::SearchIndexError;

/// Errors that end a sync cycle.
///
/// A failed cycle is logged and abandoned; the next scheduled cycle retries
/// the whole fetch and upsert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The content store could not be read.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The search index rejected or could not receive the writes.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),
}

impl IngestError {
    /// Name of the cycle stage that failed, for logging.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Source(_) => "fetch",
            Self::SearchIndex(_) => "index",
        }
    }
}
