//! One-line status text for views that render a request's result.

use crate::{Classification, EdgeJsonError, JsonResponse, RetryTrace};

/// Renders `Done` for a success, or a message explaining the failure.
pub fn status_line(result: &Result<JsonResponse, EdgeJsonError>) -> String {
    match result {
        Ok(response) if response.retried() => "Done (after retry)".to_owned(),
        Ok(_) => "Done".to_owned(),
        Err(err) => failure_line(err),
    }
}

fn failure_line(err: &EdgeJsonError) -> String {
    match err {
        EdgeJsonError::NonJsonResponse {
            status,
            content_type,
            reason,
            ..
        } if reason.is_edge_failure() => warming_up_line(*status, content_type),
        EdgeJsonError::NonJsonResponse { status, .. } => {
            format!("Unexpected non-JSON response (HTTP {status})")
        }
        EdgeJsonError::TerminalStatus {
            status,
            content_type,
            trace,
            ..
        } if trace.retried() && first_was_edge_failure(trace) => {
            warming_up_line(*status, content_type)
        }
        EdgeJsonError::TerminalStatus {
            status, message, ..
        } if (200..300).contains(status) => format!("Error: {message}"),
        EdgeJsonError::TerminalStatus {
            status, message, ..
        } => format!("Error: {message} (HTTP {status})"),
        EdgeJsonError::ClientException { source, .. } => format!("Request failed: {source}"),
        EdgeJsonError::InvalidRequest(message) => format!("Invalid request: {message}"),
        EdgeJsonError::Decode(message) => format!("Unexpected response: {message}"),
    }
}

fn first_was_edge_failure(trace: &RetryTrace) -> bool {
    matches!(trace.first, Some(Classification::Retryable(reason)) if reason.is_edge_failure())
}

fn warming_up_line(status: u16, content_type: &str) -> String {
    let content_type = if content_type.is_empty() {
        "unknown content-type"
    } else {
        content_type
    };
    format!(
        "The edge/gateway appears to be warming up (HTTP {status}, {content_type}). Please try again in a moment."
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{status_line, Classification, EdgeJsonError, JsonResponse, RetryReason, RetryTrace};

    fn trace(attempts: usize) -> RetryTrace {
        RetryTrace {
            attempts,
            first: Some(Classification::Valid),
        }
    }

    #[test]
    fn success_lines() {
        let once = JsonResponse {
            status: 200,
            value: json!({}),
            trace: trace(1),
        };
        let twice = JsonResponse {
            trace: trace(2),
            ..once.clone()
        };
        assert_eq!(status_line(&Ok(once)), "Done");
        assert_eq!(status_line(&Ok(twice)), "Done (after retry)");
    }

    #[test]
    fn html_failure_mentions_warming_up() {
        let err = EdgeJsonError::NonJsonResponse {
            status: 504,
            content_type: "text/html".to_owned(),
            body_preview: "<!DOCTYPE html>".to_owned(),
            reason: RetryReason::GatewayStatus(504),
            trace: trace(2),
        };
        let line = status_line(&Err(err));
        assert!(line.contains("warming up"));
        assert!(line.contains("HTTP 504"));
        assert!(line.contains("text/html"));
    }

    #[test]
    fn plain_non_json_is_not_blamed_on_the_edge() {
        let err = EdgeJsonError::NonJsonResponse {
            status: 500,
            content_type: "text/plain".to_owned(),
            body_preview: "oops".to_owned(),
            reason: RetryReason::NonJson,
            trace: trace(2),
        };
        assert_eq!(status_line(&Err(err)), "Unexpected non-JSON response (HTTP 500)");
    }

    #[test]
    fn terminal_lines() {
        let terminal = |status| EdgeJsonError::TerminalStatus {
            status,
            message: "bad input".to_owned(),
            code: None,
            content_type: "application/json".to_owned(),
            body_preview: String::new(),
            trace: trace(1),
        };
        assert_eq!(status_line(&Err(terminal(200))), "Error: bad input");
        assert_eq!(status_line(&Err(terminal(400))), "Error: bad input (HTTP 400)");
    }

    #[test]
    fn exhausted_gateway_status_with_json_keeps_warming_up_hint() {
        let err = EdgeJsonError::TerminalStatus {
            status: 502,
            message: "Internal server error".to_owned(),
            code: None,
            content_type: "application/json".to_owned(),
            body_preview: String::new(),
            trace: RetryTrace {
                attempts: 2,
                first: Some(Classification::Retryable(RetryReason::GatewayStatus(502))),
            },
        };
        let line = status_line(&Err(err));
        assert!(line.contains("warming up"));
        assert!(line.contains("HTTP 502"));
    }

    #[test]
    fn unretried_terminal_never_mentions_warming_up() {
        let err = EdgeJsonError::TerminalStatus {
            status: 404,
            message: "route not found".to_owned(),
            code: None,
            content_type: "application/json".to_owned(),
            body_preview: String::new(),
            trace: RetryTrace {
                attempts: 1,
                first: Some(Classification::Terminal),
            },
        };
        assert_eq!(status_line(&Err(err)), "Error: route not found (HTTP 404)");
    }
}
