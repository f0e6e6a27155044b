//! This module defines the core data structures used across the video search service.
//! It re-exports `VideoRecord` and `SearchQuery`.

pub mod search_query;
pub mod timestamp;
pub mod video_record;

pub use search_query::SearchQuery;
pub use video_record::VideoRecord;
