//! Best-effort extraction of answer text from a model reply.
//!
//! Hosted models wrap their text in different layouts. [`extract_text`] tries
//! a fixed list of shape hypotheses against the parsed reply and returns the
//! first non-empty string it finds:
//!
//! 1. `choices[]` → `message` | `content` | `text` (string, or object with `content`/`text`)
//! 2. `outputs[]` → `content[]` → first item with a `text` string
//! 3. top-level `generated_text` | `output` | `text` | `completion` | `outputText`
//! 4. `message.content[0].text` (also under an `output` wrapper)
//!
//! The order matters: a payload can satisfy more than one hypothesis.
//! Input that is not JSON comes back untouched; JSON that matches nothing comes
//! back as a bounded pretty-printed dump.

use serde_json::{Map, Value};
use tracing::debug;

/// Top-level fields that hold the answer directly in some replies.
const TEXT_SYNONYMS: [&str; 5] = ["generated_text", "output", "text", "completion", "outputText"];

/// Byte budget for the diagnostic dump returned when no hypothesis matches.
pub const FALLBACK_MAX_BYTES: usize = 2000;

/// Extracts a human-readable answer from a raw reply body. Never fails.
///
/// # Example
/// ```
/// use llm_gateway::extract_text;
///
/// assert_eq!(extract_text(r#"{"choices":[{"message":{"content":"ans"}}]}"#), "ans");
/// assert_eq!(extract_text("plain words"), "plain words");
/// assert!(!extract_text("{}").is_empty());
/// ```
pub fn extract_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => extract_from_value(&parsed),
        Err(_) => raw.to_string(),
    }
}

/// Same as [`extract_text`] for an already parsed reply.
pub fn extract_from_value(parsed: &Value) -> String {
    if let Value::String(s) = parsed {
        return s.clone();
    }

    if let Some(obj) = parsed.as_object() {
        let hypotheses: [(&str, fn(&Map<String, Value>) -> Option<&str>); 4] = [
            ("choices", from_choices),
            ("outputs", from_outputs),
            ("synonym", from_synonyms),
            ("message", from_message_parts),
        ];
        for (name, extract) in hypotheses {
            if let Some(text) = extract(obj) {
                debug!(hypothesis = name, len = text.len(), "reply text extracted");
                return text.to_string();
            }
        }
    }

    debug!("no reply shape matched, returning pretty-printed payload");
    bounded_dump(parsed)
}

/// 1) `{"choices":[{"message":{"content":"…"}}]}` and its looser variants.
fn from_choices(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("choices")?.as_array()?.iter().find_map(|choice| {
        let choice = choice.as_object()?;
        let msg = ["message", "content", "text"]
            .iter()
            .find_map(|k| choice.get(*k).filter(|v| is_present(v)))?;
        match msg {
            Value::String(s) => non_empty(s),
            Value::Array(parts) => first_text_part(parts),
            Value::Object(m) => ["content", "text"].iter().find_map(|k| match m.get(*k)? {
                Value::String(s) => non_empty(s),
                Value::Array(parts) => first_text_part(parts),
                _ => None,
            }),
            _ => None,
        }
    })
}

/// First non-empty `text` in a content part list such as `[{"type":"text","text":"…"}]`.
fn first_text_part(parts: &[Value]) -> Option<&str> {
    parts
        .iter()
        .find_map(|p| p.get("text")?.as_str().and_then(non_empty))
}

/// 2) `{"outputs":[{"content":[{"type":"output_text","text":"…"}]}]}`.
fn from_outputs(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("outputs")?
        .as_array()?
        .iter()
        .filter_map(|out| out.get("content")?.as_array())
        .flatten()
        .find_map(|item| item.get("text")?.as_str().and_then(non_empty))
}

/// 3) `{"generated_text":"…"}`, `{"output":"…"}`, …
fn from_synonyms(obj: &Map<String, Value>) -> Option<&str> {
    TEXT_SYNONYMS
        .iter()
        .find_map(|k| obj.get(*k)?.as_str().and_then(non_empty))
}

/// 4) `{"message":{"content":[{"text":"…"}]}}`, or the same under `output`.
fn from_message_parts(obj: &Map<String, Value>) -> Option<&str> {
    first_part_text(obj).or_else(|| obj.get("output")?.as_object().and_then(first_part_text))
}

fn first_part_text(holder: &Map<String, Value>) -> Option<&str> {
    holder
        .get("message")?
        .get("content")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
        .and_then(non_empty)
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(m) => !m.is_empty(),
        _ => true,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

/// Pretty JSON clamped to [`FALLBACK_MAX_BYTES`] on a char boundary.
fn bounded_dump(parsed: &Value) -> String {
    let pretty = serde_json::to_string_pretty(parsed).unwrap_or_else(|_| parsed.to_string());
    if pretty.len() <= FALLBACK_MAX_BYTES {
        return pretty;
    }
    let mut end = FALLBACK_MAX_BYTES;
    while end > 0 && !pretty.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &pretty[..end])
}
