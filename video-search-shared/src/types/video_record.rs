//! Video record types mirrored into the search index.
//!
//! This module defines the document structure that is indexed in the search engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::timestamp;

/// A video as published by the content store and stored in the search index.
///
/// The content store is the system of record; this struct is only ever
/// mirrored. `id` is stable across both stores and is used as the index
/// document ID, so re-indexing a record replaces the previous document.
///
/// # Fields
///
/// - `id`: Unique identifier, join key between the content store and the index
/// - `name`: Display name (the only searched field)
/// - `user_id`: Owner of the video
/// - `source`: Opaque storage location of the media file
/// - `created_at`: Creation timestamp
/// - `enabled`: Whether the video is published
/// - `views`: View counter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        default,
        alias = "createdAt",
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
}

impl VideoRecord {
    /// Create a new record with only the identity and name set.
    ///
    /// # Example
    ///
    /// ```
    /// use video_search_shared::VideoRecord;
    ///
    /// let record = VideoRecord::new(1, "Intro to Go");
    /// assert_eq!(record.document_id(), "1");
    /// ```
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            user_id: None,
            source: None,
            created_at: None,
            enabled: false,
            views: 0,
        }
    }

    /// Generate the document ID used in the search index.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
