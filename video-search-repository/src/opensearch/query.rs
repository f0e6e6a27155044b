//! Translation of search queries into OpenSearch query DSL and back.

use serde_json::{json, Value};

use crate::errors::SearchIndexError;
use crate::utils::substring_pattern;
use video_search_shared::{SearchQuery, VideoRecord};

/// Build the search request body for a query.
///
/// The normalized term is matched as a case-insensitive `*term*` wildcard on
/// `name` only. Results keep the engine's native order.
pub fn build_search_body(query: &SearchQuery) -> Value {
    json!({
        "from": query.offset,
        "size": query.limit,
        "query": {
            "wildcard": {
                "name": {
                    "value": substring_pattern(&query.term()),
                    "case_insensitive": true
                }
            }
        }
    })
}

/// Unwrap the `_source` of every hit into a record, dropping index metadata.
///
/// A response without `hits.hits` yields no records. A hit whose source does
/// not decode as a record is an engine failure, not a silent skip.
pub fn extract_hits(response: Value) -> Result<Vec<VideoRecord>, SearchIndexError> {
    let hits = match response.pointer("/hits/hits") {
        Some(Value::Array(hits)) => hits,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            return Err(SearchIndexError::query_engine(format!(
                "unexpected hits payload: {}",
                other
            )))
        }
    };

    hits.iter()
        .map(|hit| {
            let source = hit.get("_source").cloned().unwrap_or(Value::Null);
            serde_json::from_value(source).map_err(|e| {
                SearchIndexError::query_engine(format!(
                    "failed to decode hit {}: {}",
                    hit.get("_id").unwrap_or(&Value::Null),
                    e
                ))
            })
        })
        .collect()
}
