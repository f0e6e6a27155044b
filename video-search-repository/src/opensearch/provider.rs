//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::{
        request::JsonBody,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::RequestTimeouts;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::bulk::{build_bulk_body, parse_bulk_response};
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::opensearch::query::{build_search_body, extract_hits};
use crate::types::{IndexStatus, UpsertStats};
use video_search_shared::{SearchQuery, VideoRecord};

/// Error type OpenSearch returns when an index is created concurrently.
const ALREADY_EXISTS_ERROR: &str = "resource_already_exists_exception";

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use video_search_repository::opensearch::IndexConfig;
/// use video_search_repository::RequestTimeouts;
///
/// let provider = OpenSearchProvider::new(
///     "http://localhost:9200",
///     IndexConfig::new("videos"),
///     RequestTimeouts::default(),
/// )?;
/// provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
    timeouts: RequestTimeouts,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the specified URL.
    ///
    /// No request is sent here; connectivity is first exercised by
    /// `ensure_index_exists`.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration
    /// * `timeouts` - Per-request timeouts
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub fn new(
        url: &str,
        index_config: IndexConfig,
        timeouts: RequestTimeouts,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
            timeouts,
        })
    }

    /// The name of the index this provider reads and writes.
    pub fn index_name(&self) -> &str {
        &self.index_config.name
    }

    /// Check whether the index exists.
    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index_name()]))
            .request_timeout(self.timeouts.schema)
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::unavailable(format!(
                "Index existence check returned status {}",
                status
            ))),
        }
    }

    /// Create the index with the fixed mapping.
    async fn create_index(&self) -> Result<IndexStatus, SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(self.index_name()))
            .body(get_index_settings())
            .request_timeout(self.timeouts.schema)
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            return Ok(IndexStatus::Created);
        }

        let error_body = response.text().await.unwrap_or_default();
        if error_body.contains(ALREADY_EXISTS_ERROR) {
            debug!(index = %self.index_name(), "Index created concurrently");
            return Ok(IndexStatus::AlreadyExists);
        }

        error!(status = %status, body = %error_body, "Index creation failed");
        Err(SearchIndexError::index_creation(format!(
            "Index creation failed with status {}: {}",
            status, error_body
        )))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ensure_index_exists(&self) -> Result<IndexStatus, SearchIndexError> {
        if self.index_exists().await? {
            info!(index = %self.index_name(), "Index already exists");
            return Ok(IndexStatus::AlreadyExists);
        }

        info!(index = %self.index_name(), "Index does not exist, creating it");
        let status = self.create_index().await?;
        if status == IndexStatus::Created {
            info!(index = %self.index_name(), "Index created");
        }
        Ok(status)
    }

    /// Submit every record as an `index` action in one `_bulk` request with
    /// `refresh=true`, so the documents are searchable once this returns.
    async fn bulk_upsert(&self, records: &[VideoRecord]) -> Result<UpsertStats, SearchIndexError> {
        if records.is_empty() {
            return Ok(UpsertStats::empty());
        }

        let body: Vec<JsonBody<Value>> = build_bulk_body(self.index_name(), records)?
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(self.index_name()))
            .refresh(Refresh::True)
            .request_timeout(self.timeouts.write)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request rejected");
            return Err(SearchIndexError::batch_rejected(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::batch_rejected(e.to_string()))?;

        parse_bulk_response(&response_body, records)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>, SearchIndexError> {
        let body = build_search_body(query);
        debug!(index = %self.index_name(), body = %body, "Executing search query");

        let response = self
            .client
            .search(SearchParts::Index(&[self.index_name()]))
            .request_timeout(self.timeouts.query)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::query_engine(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query_engine(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::query_engine(e.to_string()))?;

        extract_hits(response_body)
    }
}
