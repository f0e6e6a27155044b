//! Search query types for the video search service.
//!
//! This module defines the query structure submitted against the index.

use serde::{Deserialize, Serialize};

/// Default number of results returned by a search.
pub const DEFAULT_LIMIT: usize = 10;

/// Maximum number of results a single search may return.
pub const MAX_LIMIT: usize = 100;

/// Deepest result window the engine will page into (`from + size`).
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Search query parameters.
///
/// The query string is matched as a case-insensitive substring of the
/// video name. `limit` and `offset` page through the engine's result order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// The raw search string as typed by the user.
    pub query: String,

    /// Maximum number of results to return.
    /// Default is 10, maximum is 100.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl SearchQuery {
    /// Create a new query with default paging.
    ///
    /// # Example
    ///
    /// ```
    /// use video_search_shared::SearchQuery;
    ///
    /// let query = SearchQuery::new("Intro");
    /// assert_eq!(query.term(), "intro");
    /// ```
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: default_limit(),
            offset: 0,
        }
    }

    /// Set the limit for results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_LIMIT);
        self
    }

    /// Set the offset for pagination.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// The normalized search term: trimmed and lower-cased.
    pub fn term(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Query parameter is required".to_string());
        }

        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }

        let window_end = self.offset.checked_add(self.limit);
        if window_end.map_or(true, |end| end > MAX_RESULT_WINDOW) {
            return Err(format!(
                "offset + limit must not exceed {}",
                MAX_RESULT_WINDOW
            ));
        }

        Ok(())
    }
}
