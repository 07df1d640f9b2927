use serde_json::Value;

use crate::wire::ErrorEnvelope;

/// Parses a body as JSON without failing the call.
pub(crate) fn parse_json_body(body: &str) -> Option<Value> {
    serde_json::from_str::<Value>(body).ok()
}

/// First `limit` characters of `body`, with an ellipsis when truncated.
pub(crate) fn body_preview(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

/// True when the value is an object carrying a non-null `error` key.
pub(crate) fn is_error_envelope(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|object| object.get("error"))
        .is_some_and(|error| !error.is_null())
}

/// Server-supplied message and code, if the body follows the error envelope.
pub(crate) fn error_message(value: &Value) -> (Option<String>, Option<String>) {
    let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(value.clone()) else {
        return (None, None);
    };

    let (message, code) = match &envelope.error {
        Value::Object(detail) => (
            detail.get("message").and_then(scalar_text),
            detail.get("code").and_then(scalar_text),
        ),
        Value::String(text) => (Some(text.clone()), None),
        _ => (None, None),
    };

    let message = message
        .filter(|message| !message.trim().is_empty())
        .or_else(|| scalar_text(&envelope.message))
        .filter(|message| !message.trim().is_empty());
    (message, code)
}

/// Text form of a string, number or bool; `None` for anything else.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
