//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch (or a wire-compatible Elasticsearch) as the backend.

mod bulk;
mod index_config;
mod provider;
mod query;

pub use bulk::{build_bulk_body, parse_bulk_response};
pub use index_config::{get_index_settings, IndexConfig, DEFAULT_INDEX_NAME};
pub use provider::OpenSearchProvider;
pub use query::{build_search_body, extract_hits};
