// ABOUTME: Classification of raw build-engine output into typed events.
// ABOUTME: One payload is one JSON object; keys are checked in priority order.

use serde_json::Value;

/// One classified payload from the engine's build or push stream.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// Fatal: the engine reported a failure. Aborts the whole operation.
    Error(String),
    /// A line of build output.
    Progress(String),
    /// A push status line with optional progress detail.
    StatusUpdate {
        status: String,
        progress: Option<String>,
    },
    /// Auxiliary payload emitted when a push completes.
    PushResult(Value),
    /// Anything the engine emitted that matches no known key.
    Unclassified(Value),
}

/// Truthiness the engine's own tooling applies: null, false, zero, and empty
/// strings, arrays, and objects all count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Extract a truthy value as text; non-strings are stringified.
fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        other if is_truthy(other) => Some(other.to_string()),
        _ => None,
    }
}

/// Classify one decoded payload. Key priority: error, stream, status, aux.
pub fn classify(value: Value) -> BuildEvent {
    if let Some(message) = value.get("error").and_then(non_empty_text) {
        return BuildEvent::Error(message);
    }
    if let Some(output) = value.get("stream").and_then(non_empty_text) {
        return BuildEvent::Progress(output.trim().to_string());
    }
    if let Some(status) = value.get("status").and_then(non_empty_text) {
        let progress = value.get("progress").and_then(non_empty_text);
        return BuildEvent::StatusUpdate { status, progress };
    }
    match value.get("aux") {
        Some(aux) if is_truthy(aux) => BuildEvent::PushResult(aux.clone()),
        _ => BuildEvent::Unclassified(value),
    }
}
