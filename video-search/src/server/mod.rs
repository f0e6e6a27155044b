// Server module - HTTP query façade and routing
pub mod handlers;
pub mod state;

use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use self::state::AppState;
use crate::IndexingError;
use video_search_repository::SearchIndexService;

/// Create the Axum application router with all routes and middleware
pub fn create_app(search: SearchIndexService) -> Router {
    let state = AppState { search };

    Router::new()
        .route("/search", get(handlers::search_handler))
        .route("/health", get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server on the specified address until `shutdown` resolves
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), IndexingError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| IndexingError::server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!("- Search endpoint: http://{}/search?query=", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| IndexingError::server(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use handlers::ErrorBody;
    use std::sync::Arc;
    use tower::ServiceExt;
    use video_search_repository::{
        IndexStatus, SearchIndexError, SearchIndexProvider, UpsertStats,
    };
    use video_search_shared::{SearchQuery, VideoRecord};

    struct FixedProvider {
        videos: Vec<VideoRecord>,
        fail: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for FixedProvider {
        async fn ensure_index_exists(&self) -> Result<IndexStatus, SearchIndexError> {
            Ok(IndexStatus::AlreadyExists)
        }

        async fn bulk_upsert(
            &self,
            _records: &[VideoRecord],
        ) -> Result<UpsertStats, SearchIndexError> {
            Ok(UpsertStats::empty())
        }

        async fn search(
            &self,
            query: &SearchQuery,
        ) -> Result<Vec<VideoRecord>, SearchIndexError> {
            if self.fail {
                return Err(SearchIndexError::query_engine("connection reset"));
            }
            let term = query.term();
            Ok(self
                .videos
                .iter()
                .filter(|v| v.name.to_lowercase().contains(&term))
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect())
        }
    }

    fn app(videos: Vec<VideoRecord>, fail: bool) -> Router {
        let provider = Arc::new(FixedProvider { videos, fail });
        create_app(SearchIndexService::new(provider))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn error_of(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorBody>(body).unwrap().error
    }

    #[tokio::test]
    async fn test_search_returns_matches() {
        let app = app(vec![VideoRecord::new(1, "Intro to Go")], false);

        let (status, body) = get(app, "/search?query=go").await;

        assert_eq!(status, StatusCode::OK);
        let videos: Vec<VideoRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(videos, vec![VideoRecord::new(1, "Intro to Go")]);
    }

    #[tokio::test]
    async fn test_missing_or_blank_query_is_bad_request() {
        for uri in ["/search", "/search?query=", "/search?query=%20%20%20"] {
            let (status, body) = get(app(vec![], false), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
            assert_eq!(error_of(&body), "Query parameter is required");
        }
    }

    #[tokio::test]
    async fn test_zero_hits_is_not_found() {
        let app = app(vec![VideoRecord::new(1, "Intro to Go")], false);

        let (status, body) = get(app, "/search?query=rust").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_of(&body), "No results found for query: 'rust'");
    }

    #[tokio::test]
    async fn test_not_found_message_uses_normalized_term() {
        let app = app(vec![VideoRecord::new(1, "Intro to Go")], false);

        let (status, body) = get(app, "/search?query=%20Rust%20").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_of(&body), "No results found for query: 'rust'");
    }

    #[tokio::test]
    async fn test_engine_failure_is_internal_error() {
        let (status, body) = get(app(vec![], true), "/search?query=go").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_of(&body).starts_with("Failed to search videos: "));
    }

    #[tokio::test]
    async fn test_invalid_paging_is_bad_request() {
        for uri in [
            "/search?query=go&limit=abc",
            "/search?query=go&limit=0",
            "/search?query=go&limit=101",
            "/search?query=go&offset=-3",
            "/search?query=go&offset=9995&limit=10",
            "/search?query=go&offset=18446744073709551615",
        ] {
            let (status, _) = get(app(vec![], false), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        }
    }

    #[tokio::test]
    async fn test_paging_is_forwarded() {
        let videos = (1..=5)
            .map(|id| VideoRecord::new(id, format!("Cat video {}", id)))
            .collect();

        let (status, body) = get(app(videos, false), "/search?query=cat&limit=2&offset=1").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = serde_json::from_slice::<Vec<VideoRecord>>(&body)
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _) = get(app(vec![], false), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
