//! # Video Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! video search index. It includes definitions for errors, interfaces, the
//! query service, and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod types;
pub mod utils;

pub use config::RequestTimeouts;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use service::SearchIndexService;
pub use types::{IndexStatus, UpsertFailure, UpsertStats};
pub use utils::{escape_wildcard, substring_pattern};
