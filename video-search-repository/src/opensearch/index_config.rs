//! OpenSearch index configuration and mappings.
//!
//! This module defines the mapping for the video search index. The mapping is
//! fixed at creation time and never migrated in place.

use serde_json::{json, Value};

/// The default name of the video index.
pub const DEFAULT_INDEX_NAME: &str = "videos";

/// Configuration for the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The index name used for all operations.
    pub name: String,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

/// Get the mappings for the video search index.
///
/// `name` and `source` are analyzed text; identifiers and counters are integers.
pub fn get_index_settings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "name": { "type": "text" },
                "id": { "type": "integer" },
                "user_id": { "type": "integer" },
                "source": { "type": "text" },
                "created_at": { "type": "date" },
                "enabled": { "type": "boolean" },
                "views": { "type": "integer" }
            }
        }
    })
}
