//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{IndexStatus, UpsertStats};
use video_search_shared::{SearchQuery, VideoRecord};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the sync loader and into `SearchIndexService`
/// so that both can be tested against in-memory mocks. The backend is expected to
/// provide its own concurrency safety; callers add no locking around reads.
///
/// # Index Initialization
///
/// Callers should invoke `ensure_index_exists` during startup before performing
/// document operations. It is idempotent and safe to call concurrently.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the search index exists with the fixed video mapping, creating it if necessary.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexStatus::Created)` - If the index was missing and has been created
    /// * `Ok(IndexStatus::AlreadyExists)` - If the index was present, or a concurrent
    ///   caller created it first
    /// * `Err(SearchIndexError::IndexUnavailable)` - If the backend cannot be reached
    /// * `Err(SearchIndexError::IndexCreationError)` - If the backend refuses the creation
    async fn ensure_index_exists(&self) -> Result<IndexStatus, SearchIndexError>;

    /// Index or fully replace one document per record, keyed by record ID, in a single batch.
    ///
    /// Writes must be visible to searches by the time this returns. Documents the
    /// backend rejects individually are reported in `UpsertStats::errors`.
    ///
    /// # Arguments
    ///
    /// * `records` - The records to write; callers skip the call for an empty slice
    ///
    /// # Returns
    ///
    /// * `Ok(UpsertStats)` - Written count and per-item failures
    /// * `Err(SearchIndexError::IndexUnavailable)` - If the backend cannot be reached
    /// * `Err(SearchIndexError::BatchRejected)` - If the batch is rejected as a whole
    async fn bulk_upsert(&self, records: &[VideoRecord]) -> Result<UpsertStats, SearchIndexError>;

    /// Run a case-insensitive substring match of the query term against video names.
    ///
    /// The query has already been validated by the caller. Results are returned
    /// in the backend's native order with index metadata stripped.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<VideoRecord>)` - Matching records, possibly empty
    /// * `Err(SearchIndexError::QueryEngineFailure)` - If the query could not be executed
    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>, SearchIndexError>;
}
