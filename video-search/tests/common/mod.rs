//! In-memory stand-ins for the content store and the search engine.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tower::ServiceExt;

use video_search::source::{SourceError, SourceFetcher};
use video_search_repository::{
    IndexStatus, SearchIndexError, SearchIndexProvider, UpsertStats,
};
use video_search_shared::{SearchQuery, VideoRecord};

/// Index with real substring semantics, ordered by id.
#[derive(Default)]
pub struct InMemoryIndex {
    docs: Mutex<BTreeMap<i64, VideoRecord>>,
    created: AtomicBool,
    ensure_failures_left: AtomicUsize,
    pub ensure_calls: AtomicUsize,
    pub bulk_calls: AtomicUsize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` index checks with `IndexUnavailable`.
    pub fn failing_ensure(n: usize) -> Self {
        let index = Self::default();
        index.ensure_failures_left.store(n, Ordering::SeqCst);
        index
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchIndexProvider for InMemoryIndex {
    async fn ensure_index_exists(&self) -> Result<IndexStatus, SearchIndexError> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .ensure_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SearchIndexError::unavailable("connection refused"));
        }
        if self.created.swap(true, Ordering::SeqCst) {
            Ok(IndexStatus::AlreadyExists)
        } else {
            Ok(IndexStatus::Created)
        }
    }

    async fn bulk_upsert(&self, records: &[VideoRecord]) -> Result<UpsertStats, SearchIndexError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        for record in records {
            docs.insert(record.id, record.clone());
        }
        Ok(UpsertStats {
            written: records.len(),
            errors: vec![],
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>, SearchIndexError> {
        let term = query.term();
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .values()
            .filter(|v| v.name.to_lowercase().contains(&term))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// Content store returning a fixed list, optionally slowly or not at all.
pub struct StaticSource {
    videos: Mutex<Vec<VideoRecord>>,
    delay: Duration,
    pub unreachable: AtomicBool,
    pub calls: AtomicUsize,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl StaticSource {
    pub fn new(videos: Vec<VideoRecord>) -> Self {
        Self::with_delay(videos, Duration::ZERO)
    }

    pub fn with_delay(videos: Vec<VideoRecord>, delay: Duration) -> Self {
        Self {
            videos: Mutex::new(videos),
            delay,
            unreachable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn set_videos(&self, videos: Vec<VideoRecord>) {
        *self.videos.lock().unwrap() = videos;
    }
}

#[async_trait]
impl SourceFetcher for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<VideoRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(SourceError::unreachable("connection refused"));
        }
        Ok(self.videos.lock().unwrap().clone())
    }
}

/// Issue a GET against the router and return status and body.
pub async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

/// Ids of the records in a 200 search response.
pub fn ids(body: &[u8]) -> Vec<i64> {
    serde_json::from_slice::<Vec<VideoRecord>>(body)
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect()
}
