//! Provider response decoder.
//!
//! Responses arrive in several shapes depending on SDK and provider: a
//! flat `text` field, Gemini's `candidates[].content.parts[].text`, or no
//! text plus a safety block indicator (camelCase from the REST API,
//! snake_case from SDK dumps). Text sources are tried in a fixed order and
//! the first non-empty one wins; block indicators are consulted only when
//! no text was found.

use serde_json::Value;

/// Finish reasons that mean the candidate was withheld for policy reasons.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// What a single response payload carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Text(String),
    Blocked(String),
    Empty,
}

/// Decode a complete (non-streaming) response.
///
/// Whitespace-only text counts as no text.
pub fn decode_response(payload: &Value) -> Decoded {
    if let Some(text) = extract_text(payload).filter(|t| !t.trim().is_empty()) {
        return Decoded::Text(text);
    }
    match block_reason(payload) {
        Some(reason) => Decoded::Blocked(reason),
        None => Decoded::Empty,
    }
}

/// Extract text from a payload: direct `text` field first, then the joined
/// parts of the first candidate. Returns `None` rather than an empty string.
pub fn extract_text(payload: &Value) -> Option<String> {
    direct_text(payload).or_else(|| candidate_text(payload))
}

/// The block reason carried by a payload, if any.
pub fn block_reason(payload: &Value) -> Option<String> {
    let feedback = field(payload, "promptFeedback", "prompt_feedback");
    if let Some(reason) = feedback
        .and_then(|f| field(f, "blockReason", "block_reason"))
        .and_then(reason_name)
    {
        return Some(reason);
    }

    let first = payload.get("candidates")?.as_array()?.first()?;
    let reason = field(first, "finishReason", "finish_reason").and_then(reason_name)?;
    BLOCKING_FINISH_REASONS
        .contains(&reason.as_str())
        .then_some(reason)
}

fn direct_text(payload: &Value) -> Option<String> {
    payload
        .get("text")?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

fn candidate_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let joined: String = parts
        .iter()
        .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!joined.is_empty()).then_some(joined)
}

fn field<'a>(value: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    value
        .get(camel)
        .or_else(|| value.get(snake))
        .filter(|v| !v.is_null())
}

/// Reasons appear as plain strings (REST) or as enum objects with a `name`.
fn reason_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("name")?.as_str()?,
        _ => return None,
    };
    (!name.is_empty()).then(|| name.to_string())
}
