//! Configuration types for search index requests.

use std::time::Duration;

/// Request-scoped timeouts applied to every call against the search backend.
///
/// A slow backend must never stall the sync scheduler or pile up query
/// handlers, so each class of request carries its own upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    /// Timeout for index existence checks and index creation.
    pub schema: Duration,
    /// Timeout for bulk upserts. Defaults to 30 seconds.
    pub write: Duration,
    /// Timeout for search queries. Defaults to 5 seconds.
    pub query: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            schema: Duration::from_secs(10),
            write: Duration::from_secs(30),
            query: Duration::from_secs(5),
        }
    }
}

impl RequestTimeouts {
    /// Override the bulk write timeout.
    pub fn with_write(mut self, write: Duration) -> Self {
        self.write = write;
        self
    }

    /// Override the search query timeout.
    pub fn with_query(mut self, query: Duration) -> Self {
        self.query = query;
        self
    }
}
