//! Field normalization for todos.
//!
//! Everything here is pure and infallible: invalid input is coerced to a safe
//! value instead of producing an error. Title is the exception in that an
//! empty result is reported as `None` so callers can decide between
//! rejecting (create) and ignoring (update).

use serde_json::Value;

use crate::config::StatesConfig;
use crate::todo::Todo;

/// Trimmed title, or `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Configured spelling of a known state, else the default state.
///
/// Matching is case-insensitive; the result is always one of the configured
/// entries, so applying this twice is the same as applying it once.
pub fn normalize_state(raw: &str, states: &StatesConfig) -> String {
    states
        .canonical(raw)
        .unwrap_or_else(|| states.default_state())
        .to_string()
}

pub fn normalize_comment(raw: &str) -> String {
    raw.trim().to_string()
}

/// Coerce one persisted record into a [`Todo`].
///
/// Returns `None` for values that are not JSON objects; every other shape is
/// accepted with per-field fallbacks so a single bad field never drops the
/// record.
pub fn normalize_record(raw: &Value, states: &StatesConfig) -> Option<Todo> {
    let object = raw.as_object()?;

    let id = object.get("id").and_then(value_id).unwrap_or(0);
    let title = object
        .get("title")
        .and_then(value_text)
        .map(|title| title.trim().to_string())
        .unwrap_or_default();
    let done = object
        .get("done")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let state = object
        .get("state")
        .and_then(value_text)
        .map(|state| normalize_state(&state, states))
        .unwrap_or_else(|| states.default_state().to_string());
    let comment = object
        .get("comment")
        .and_then(value_text)
        .map(|comment| normalize_comment(&comment))
        .unwrap_or_default();

    Some(Todo {
        id,
        title,
        done,
        state,
        comment,
    })
}

/// Text form of a scalar JSON value; `None` for null, arrays and objects.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose truthiness: empty strings, zero, empty containers and null are false.
pub fn value_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn value_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
