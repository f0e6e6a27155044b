//! # Video Search Shared
//!
//! This crate defines shared data structures used across the video search
//! service. It includes the video record mirrored from the content store and
//! the search query submitted against the index.

pub mod types;

pub use types::search_query::SearchQuery;
pub use types::video_record::VideoRecord;
