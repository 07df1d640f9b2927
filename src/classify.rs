//! Attempt classification.
//!
//! An edge or API gateway that is still warming up answers with its own HTML
//! error page or a 502/503/504 instead of the backend's JSON. Those answers
//! are [`Classification::Retryable`]; anything the backend itself produced is
//! either [`Classification::Valid`] or [`Classification::Terminal`].

use std::fmt;

use crate::{decode, AttemptOutcome, RequestOptions};

/// Why an attempt was judged a transient edge failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetryReason {
    /// Status is listed in [`RequestOptions::retry_on_statuses`].
    GatewayStatus(u16),
    /// `Content-Type` names `text/html`.
    HtmlContentType,
    /// Body starts with an HTML document marker.
    HtmlBody,
    /// Body is not parseable JSON.
    NonJson,
}

impl RetryReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GatewayStatus(_) => "gateway_status",
            Self::HtmlContentType => "html_content_type",
            Self::HtmlBody => "html_body",
            Self::NonJson => "non_json",
        }
    }

    /// True when the reason points at an intermediary rather than the backend.
    pub fn is_edge_failure(self) -> bool {
        !matches!(self, Self::NonJson)
    }
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GatewayStatus(status) => write!(f, "gateway status {status}"),
            Self::HtmlContentType => f.write_str("HTML content-type"),
            Self::HtmlBody => f.write_str("HTML document body"),
            Self::NonJson => f.write_str("body is not JSON"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Valid,
    Retryable(RetryReason),
    Terminal,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Retryable(_) => "retryable",
            Self::Terminal => "terminal",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retryable(reason) => write!(f, "retryable ({reason})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Detects an HTML document from its content-type or its leading bytes.
pub fn looks_like_html(content_type: &str, body: &str) -> bool {
    html_reason(content_type, body).is_some()
}

fn html_reason(content_type: &str, body: &str) -> Option<RetryReason> {
    if content_type.to_ascii_lowercase().contains("text/html") {
        return Some(RetryReason::HtmlContentType);
    }
    let head = body.trim_start();
    if starts_with_ignore_case(head, "<!doctype html") || starts_with_ignore_case(head, "<html") {
        return Some(RetryReason::HtmlBody);
    }
    None
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Classifies one attempt under the given options.
pub fn classify(outcome: &AttemptOutcome, opts: &RequestOptions) -> Classification {
    if opts.retries_on_status(outcome.status) {
        return Classification::Retryable(RetryReason::GatewayStatus(outcome.status));
    }
    if let Some(reason) = html_reason(&outcome.content_type, &outcome.body) {
        return Classification::Retryable(reason);
    }
    let Some(value) = outcome.json.as_ref() else {
        return Classification::Retryable(RetryReason::NonJson);
    };
    if outcome.is_success() && !decode::is_error_envelope(value) {
        Classification::Valid
    } else {
        Classification::Terminal
    }
}
