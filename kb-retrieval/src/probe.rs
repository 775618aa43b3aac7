//! Mappers turning heterogeneous retrieval replies into canonical [`KbHit`]s.
//!
//! Field names differ between service versions, so every field is probed at
//! several plausible locations. Anything missing becomes [`UNKNOWN`] (text)
//! or `0.0` (score).

use serde_json::{Map, Value};

use crate::record::{KbHit, UNKNOWN};

/// Top-level keys that may hold the hit array.
const LIST_KEYS: [&str; 4] = ["retrievalResults", "results", "hits", "items"];

/// Metadata key holding the document URI.
const SOURCE_META_KEY: &str = "x-amz-bedrock-kb-source-uri";

/// Extracts hits from a reply, keeping service order.
///
/// Accepts a bare array or an object holding the array under one of
/// [`LIST_KEYS`]. Non-object entries are skipped.
pub fn map_hits(reply: &Value) -> Vec<KbHit> {
    let list = match reply {
        Value::Array(items) => Some(items),
        Value::Object(obj) => LIST_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array)),
        _ => None,
    };

    list.map(|items| items.iter().filter_map(map_hit).collect())
        .unwrap_or_default()
}

/// Map one hit object.
///
/// Heuristic:
/// - content: `content.text` / `content` / `text` / `excerpt`
/// - source: `location.s3Location.uri` / `metadata[x-amz-bedrock-kb-source-uri]` / `source` / `uri`
/// - title: `metadata.title` / `title` / last path segment of the source
/// - score: `score` / `relevanceScore` / `relevance_score`
pub fn map_hit(v: &Value) -> Option<KbHit> {
    let obj = v.as_object()?;
    let metadata = obj.get("metadata").and_then(Value::as_object);

    let content = obj
        .get("content")
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
        .or_else(|| pick_str(obj, &["content", "text", "excerpt"]));

    let source = obj
        .get("location")
        .and_then(|l| l.get("s3Location"))
        .and_then(|s| s.get("uri"))
        .and_then(Value::as_str)
        .or_else(|| metadata.and_then(|m| pick_str(m, &[SOURCE_META_KEY])))
        .or_else(|| pick_str(obj, &["source", "uri"]));

    let title = metadata
        .and_then(|m| pick_str(m, &["title"]))
        .or_else(|| pick_str(obj, &["title"]))
        .map(str::to_string)
        .or_else(|| source.and_then(file_name));

    let score = ["score", "relevanceScore", "relevance_score"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_f64))
        .unwrap_or(0.0) as f32;

    Some(KbHit {
        title: title.unwrap_or_else(|| UNKNOWN.to_string()),
        content: content.unwrap_or(UNKNOWN).to_string(),
        source: source.unwrap_or(UNKNOWN).to_string(),
        score,
    })
}

/// First non-empty string among `keys`.
fn pick_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Last path segment of a URI or path, e.g. `machine_files.pdf`.
fn file_name(source: &str) -> Option<String> {
    source
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.ends_with(':'))
        .map(str::to_string)
}
