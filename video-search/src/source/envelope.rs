//! Parser for the content store's list response.
//!
//! The store wraps its payload as `{ "data": { "videos": [...] } }`. Absent or
//! null `data`/`videos` mean there is nothing to index. Any other shape is
//! rejected rather than read optimistically.

use serde_json::Value;

use super::SourceError;
use video_search_shared::VideoRecord;

/// Unwrap the list envelope into records.
pub fn parse_envelope(payload: Value) -> Result<Vec<VideoRecord>, SourceError> {
    let data = match payload {
        Value::Object(mut root) => root.remove("data"),
        other => {
            return Err(SourceError::malformed(format!(
                "expected a JSON object, got {}",
                kind(&other)
            )))
        }
    };

    let videos = match data {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(mut data)) => data.remove("videos"),
        Some(other) => {
            return Err(SourceError::malformed(format!(
                "`data` must be an object, got {}",
                kind(&other)
            )))
        }
    };

    match videos {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(position, item)| {
                serde_json::from_value(item).map_err(|e| {
                    SourceError::malformed(format!("`data.videos[{}]`: {}", position, e))
                })
            })
            .collect(),
        Some(other) => Err(SourceError::malformed(format!(
            "`data.videos` must be an array, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
