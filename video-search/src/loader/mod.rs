//! Loader module for the video search service.
//!
//! Writes fetched videos into the search index in a single bulk upsert.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::IngestError;
use video_search_repository::{IndexStatus, SearchIndexProvider, UpsertStats};
use video_search_shared::VideoRecord;

/// Loader that indexes videos into the search engine.
///
/// The loader is responsible for:
/// - Skipping the backend round trip when there is nothing to write
/// - Submitting every record as one idempotent bulk upsert
/// - Logging per-item failures without failing the batch
#[derive(Clone)]
pub struct SearchLoader {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchLoader {
    /// Create a new search loader with the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Upsert every record, keyed by record ID.
    ///
    /// Returns an error only when the batch as a whole fails; documents the
    /// backend refuses individually are reported in `UpsertStats::errors`.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn upsert(&self, records: &[VideoRecord]) -> Result<UpsertStats, IngestError> {
        if records.is_empty() {
            debug!("No videos to index");
            return Ok(UpsertStats::empty());
        }

        match self.provider.bulk_upsert(records).await {
            Ok(stats) => {
                if stats.has_failures() {
                    warn!(
                        written = stats.written,
                        failed = stats.errors.len(),
                        "Bulk upsert completed with some failures"
                    );
                    for failure in &stats.errors {
                        error!(
                            video_id = failure.id,
                            reason = %failure.reason,
                            "Failed to index video"
                        );
                    }
                } else {
                    debug!(written = stats.written, "Successfully indexed all videos");
                }
                Ok(stats)
            }
            Err(e) => {
                error!(error = %e, count = records.len(), "Failed to bulk upsert videos");
                Err(e.into())
            }
        }
    }

    /// Make sure the index exists before writing to it.
    pub async fn ensure_index(&self) -> Result<IndexStatus, IngestError> {
        let status = self.provider.ensure_index_exists().await?;
        info!(status = ?status, "Search index is ready");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use video_search_repository::{SearchIndexError, UpsertFailure};
    use video_search_shared::SearchQuery;

    /// Mock search provider for testing.
    struct MockSearchProvider {
        bulk_calls: AtomicUsize,
        rejected_id: Option<i64>,
        fail_batch: bool,
    }

    impl MockSearchProvider {
        fn new() -> Self {
            Self {
                bulk_calls: AtomicUsize::new(0),
                rejected_id: None,
                fail_batch: false,
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn ensure_index_exists(&self) -> Result<IndexStatus, SearchIndexError> {
            Ok(IndexStatus::Created)
        }

        async fn bulk_upsert(
            &self,
            records: &[VideoRecord],
        ) -> Result<UpsertStats, SearchIndexError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_batch {
                return Err(SearchIndexError::batch_rejected("413 Request Entity Too Large"));
            }

            let mut stats = UpsertStats::empty();
            for record in records {
                if Some(record.id) == self.rejected_id {
                    stats.errors.push(UpsertFailure {
                        id: record.id,
                        reason: "mapper_parsing_exception".to_string(),
                    });
                } else {
                    stats.written += 1;
                }
            }
            Ok(stats)
        }

        async fn search(
            &self,
            _query: &SearchQuery,
        ) -> Result<Vec<VideoRecord>, SearchIndexError> {
            Ok(vec![])
        }
    }

    fn records() -> Vec<VideoRecord> {
        vec![
            VideoRecord::new(1, "Test 1"),
            VideoRecord::new(2, "Test 2"),
            VideoRecord::new(3, "Test 3"),
        ]
    }

    #[tokio::test]
    async fn test_upsert_empty_skips_backend() {
        let provider = Arc::new(MockSearchProvider::new());
        let loader = SearchLoader::new(provider.clone());

        let stats = loader.upsert(&[]).await.unwrap();

        assert_eq!(stats, UpsertStats::empty());
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upsert_submits_single_batch() {
        let provider = Arc::new(MockSearchProvider::new());
        let loader = SearchLoader::new(provider.clone());

        let stats = loader.upsert(&records()).await.unwrap();

        assert_eq!(stats.written, 3);
        assert!(stats.errors.is_empty());
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upsert_reports_item_failures_without_failing() {
        let provider = Arc::new(MockSearchProvider {
            rejected_id: Some(2),
            ..MockSearchProvider::new()
        });
        let loader = SearchLoader::new(provider);

        let stats = loader.upsert(&records()).await.unwrap();

        assert_eq!(stats.written, 2);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].id, 2);
    }

    #[tokio::test]
    async fn test_upsert_batch_rejection_is_error() {
        let provider = Arc::new(MockSearchProvider {
            fail_batch: true,
            ..MockSearchProvider::new()
        });
        let loader = SearchLoader::new(provider);

        let result = loader.upsert(&records()).await;
        assert!(matches!(
            result,
            Err(IngestError::SearchIndex(SearchIndexError::BatchRejected(_)))
        ));
    }
}
