//! Search index error types.
//!
//! Write-side errors (`IndexUnavailable`, `BatchRejected`) describe failures of
//! a whole request. Failures of individual documents inside a bulk request are
//! not errors; they are reported in `UpsertStats::errors`.

use thiserror::Error;

/// Unified errors from search index operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchIndexError {
    /// The search backend could not be reached or is not answering.
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// The backend refused to create the index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// A bulk request was rejected as a whole.
    #[error("Batch rejected: {0}")]
    BatchRejected(String),

    /// The search request is invalid (empty query, bad paging).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The backend failed to execute a query or returned an unusable response.
    #[error("Query engine failure: {0}")]
    QueryEngineFailure(String),

    /// Failed to serialize data for the search backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create an index unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::IndexUnavailable(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a batch rejected error.
    pub fn batch_rejected(msg: impl Into<String>) -> Self {
        Self::BatchRejected(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a query engine failure.
    pub fn query_engine(msg: impl Into<String>) -> Self {
        Self::QueryEngineFailure(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Whether the error was caused by the caller rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}
