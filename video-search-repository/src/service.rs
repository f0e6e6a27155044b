//! Search index service implementation.
//!
//! This module provides the query side of the video index. It validates and
//! normalizes raw search input before delegating to a `SearchIndexProvider`.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use video_search_shared::{SearchQuery, VideoRecord};

/// The main service for querying the video index.
///
/// This is the high-level API that request handlers use. It rejects empty
/// queries and out-of-range paging with `SearchIndexError::InvalidQuery`
/// before any request reaches the backend.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use video_search_repository::opensearch::{IndexConfig, OpenSearchProvider};
/// use video_search_repository::{RequestTimeouts, SearchIndexService};
/// use video_search_shared::SearchQuery;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OpenSearchProvider::new(
///     "http://localhost:9200",
///     IndexConfig::new("videos"),
///     RequestTimeouts::default(),
/// )?;
/// let service = SearchIndexService::new(Arc::new(provider));
///
/// let videos = service.search(SearchQuery::new("intro")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchIndexService {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchIndexService {
    /// Create a new SearchIndexService over the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Search video names for a case-insensitive substring.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<VideoRecord>)` - Matches in the engine's order; empty when nothing matched
    /// * `Err(SearchIndexError::InvalidQuery)` - If the query is blank or paging is out of range
    /// * `Err(SearchIndexError::QueryEngineFailure)` - If the backend fails
    #[instrument(skip(self, query), fields(term = %query.term(), limit = query.limit, offset = query.offset))]
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<VideoRecord>, SearchIndexError> {
        query.validate().map_err(SearchIndexError::invalid_query)?;

        let records = self.provider.search(&query).await?;

        debug!(hit_count = records.len(), "Search completed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IndexStatus, UpsertStats};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock provider for testing
    struct MockProvider {
        records: Vec<VideoRecord>,
        search_calls: AtomicUsize,
        should_fail: bool,
    }

    impl MockProvider {
        fn new(records: Vec<VideoRecord>) -> Self {
            Self {
                records,
                search_calls: AtomicUsize::new(0),
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new(vec![])
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ensure_index_exists(&self) -> Result<IndexStatus, SearchIndexError> {
            Ok(IndexStatus::AlreadyExists)
        }

        async fn bulk_upsert(
            &self,
            records: &[VideoRecord],
        ) -> Result<UpsertStats, SearchIndexError> {
            Ok(UpsertStats {
                written: records.len(),
                errors: vec![],
            })
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>, SearchIndexError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                return Err(SearchIndexError::query_engine("Mock failure"));
            }
            let term = query.term();
            Ok(self
                .records
                .iter()
                .filter(|r| r.name.to_lowercase().contains(&term))
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect())
        }
    }

    fn catalog() -> Vec<VideoRecord> {
        vec![
            VideoRecord::new(1, "Intro to Go"),
            VideoRecord::new(2, "Category Theory"),
            VideoRecord::new(3, "Cooking for Cats"),
        ]
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query_without_calling_backend() {
        let provider = Arc::new(MockProvider::new(catalog()));
        let service = SearchIndexService::new(provider.clone());

        for blank in ["", "   ", "\t"] {
            let result = service.search(SearchQuery::new(blank)).await;
            assert!(matches!(result, Err(SearchIndexError::InvalidQuery(_))));
        }
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let service = SearchIndexService::new(Arc::new(MockProvider::new(catalog())));

        let upper = service.search(SearchQuery::new("Cat")).await.unwrap();
        let lower = service.search(SearchQuery::new("cat")).await.unwrap();

        assert_eq!(upper, lower);
        assert_eq!(
            upper.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[tokio::test]
    async fn test_search_no_matches_is_ok_and_empty() {
        let service = SearchIndexService::new(Arc::new(MockProvider::new(catalog())));

        let result = service.search(SearchQuery::new("haskell")).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_search_propagates_engine_failure() {
        let service = SearchIndexService::new(Arc::new(MockProvider::failing()));

        let result = service.search(SearchQuery::new("go")).await;
        assert!(matches!(
            result,
            Err(SearchIndexError::QueryEngineFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_search_paging() {
        let service = SearchIndexService::new(Arc::new(MockProvider::new(catalog())));

        let page = service
            .search(SearchQuery::new("o").with_limit(1).with_offset(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);
    }
}
