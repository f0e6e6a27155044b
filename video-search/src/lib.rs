//! # Video Search
//!
//! Keeps an OpenSearch index of videos synchronized with the content store
//! and serves case-insensitive name search over HTTP.
//!
//! ## Architecture
//!
//! The service follows a Fetch-Load pattern driven by a scheduler:
//!
//! 1. **Source**: Fetches every video from the content store
//! 2. **Loader**: Bulk-upserts the videos into the search index
//! 3. **Orchestrator**: Runs one fetch-then-load cycle per tick, never two at once
//! 4. **Server**: Answers `GET /search` against the current index state
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`source`]: Content store client
//! - [`loader`]: Writes records into the search index
//! - [`orchestrator`]: Periodic sync scheduler
//! - [`server`]: HTTP query façade
//! - [`errors`]: Error types for sync cycles

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod server;
pub mod source;

pub use config::{Config, Dependencies, StartupMode};
pub use errors::IngestError;

use thiserror::Error;
use video_search_repository::SearchIndexError;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The search index could not be prepared at startup.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// The HTTP server failed.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}
