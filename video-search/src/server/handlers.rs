// HTTP request handlers
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::server::state::AppState;
use video_search_repository::SearchIndexError;
use video_search_shared::{types::search_query::DEFAULT_LIMIT, SearchQuery};

/// Query string of `GET /search`.
///
/// Every field is taken as text so a malformed number becomes a JSON 400
/// instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// JSON body of every non-200 response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn parse_paging(raw: Option<&str>, name: &str, default: usize) -> Result<usize, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| format!("{} must be a non-negative integer", name)),
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Video search is running")
}

/// Search endpoint - case-insensitive substring match on video names
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let raw_query = params.query.unwrap_or_default();

    let limit = match parse_paging(params.limit.as_deref(), "limit", DEFAULT_LIMIT) {
        Ok(limit) => limit,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };
    let offset = match parse_paging(params.offset.as_deref(), "offset", 0) {
        Ok(offset) => offset,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    let query = SearchQuery {
        query: raw_query.clone(),
        limit,
        offset,
    };
    let term = query.term();

    match state.search.search(query).await {
        Ok(videos) if videos.is_empty() => {
            info!(query = %raw_query, "No videos matched");
            error_response(
                StatusCode::NOT_FOUND,
                format!("No results found for query: '{}'", term),
            )
        }
        Ok(videos) => {
            info!(query = %raw_query, hit_count = videos.len(), "Search succeeded");
            (StatusCode::OK, Json(videos)).into_response()
        }
        Err(SearchIndexError::InvalidQuery(msg)) => {
            warn!(query = %raw_query, reason = %msg, "Rejected search request");
            error_response(StatusCode::BAD_REQUEST, msg)
        }
        Err(e) => {
            error!(query = %raw_query, error = %e, "Search failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to search videos: {}", e),
            )
        }
    }
}
