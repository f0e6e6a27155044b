//! Bulk request construction and response parsing.

use serde_json::{json, Value};

use crate::errors::SearchIndexError;
use crate::types::{UpsertFailure, UpsertStats};
use video_search_shared::VideoRecord;

/// Build the NDJSON lines of a bulk request: one `index` action per record
/// followed by the full document. `index` replaces any existing document with
/// the same `_id`, which makes reruns idempotent.
pub fn build_bulk_body(index: &str, records: &[VideoRecord]) -> Result<Vec<Value>, SearchIndexError> {
    let mut body = Vec::with_capacity(records.len() * 2);
    for record in records {
        let document = serde_json::to_value(record)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
        body.push(json!({ "index": { "_index": index, "_id": record.document_id() } }));
        body.push(document);
    }
    Ok(body)
}

/// Parse a bulk response into written counts and per-item failures.
///
/// Items are matched to records by position, which the bulk API guarantees.
/// A response without an `items` array of the right length is treated as a
/// wholesale rejection.
pub fn parse_bulk_response(
    response: &Value,
    records: &[VideoRecord],
) -> Result<UpsertStats, SearchIndexError> {
    let items = response
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::batch_rejected("bulk response has no items"))?;

    if items.len() != records.len() {
        return Err(SearchIndexError::batch_rejected(format!(
            "bulk response has {} items for {} records",
            items.len(),
            records.len()
        )));
    }

    let mut stats = UpsertStats::empty();
    for (item, record) in items.iter().zip(records) {
        // Each item is keyed by its action name.
        let result = item.get("index").unwrap_or(item);
        match result.get("error") {
            Some(error) if !error.is_null() => stats.errors.push(UpsertFailure {
                id: record.id,
                reason: describe_item_error(error),
            }),
            _ => stats.written += 1,
        }
    }

    Ok(stats)
}

fn describe_item_error(error: &Value) -> String {
    let kind = error.get("type").and_then(Value::as_str);
    let reason = error.get("reason").and_then(Value::as_str);
    match (kind, reason) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (Some(kind), None) => kind.to_string(),
        (None, Some(reason)) => reason.to_string(),
        (None, None) => error.to_string(),
    }
}
