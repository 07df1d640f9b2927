use std::fmt;

use crate::{RetryReason, RetryTrace};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum EdgeJsonError {
    /// Last attempt was a transient edge failure without usable JSON.
    #[error("non-JSON response (HTTP {status}, content-type '{content_type}', {reason}): {body_preview}")]
    NonJsonResponse {
        status: u16,
        content_type: String,
        /// Bounded head of the raw body.
        body_preview: String,
        reason: RetryReason,
        trace: RetryTrace,
    },
    /// Well-formed JSON error body or a non-retryable failing status.
    #[error("http error {status}: {message}")]
    TerminalStatus {
        status: u16,
        /// Server-supplied message, or `HTTP <status>` when none was sent.
        message: String,
        /// Server-supplied error code, when present.
        code: Option<String>,
        content_type: String,
        body_preview: String,
        trace: RetryTrace,
    },
    /// Request could not be completed at all.
    #[error("client exception: {source}")]
    ClientException {
        #[source]
        source: reqwest::Error,
        trace: RetryTrace,
    },
    /// Request was rejected before any network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Payload could not be mapped onto the requested type.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Stable name of each failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NonJsonResponse,
    TerminalStatus,
    ClientException,
    InvalidRequest,
    Decode,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonJsonResponse => "non_json_response",
            Self::TerminalStatus => "terminal_status",
            Self::ClientException => "client_exception",
            Self::InvalidRequest => "invalid_request",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EdgeJsonError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NonJsonResponse { .. } => FailureKind::NonJsonResponse,
            Self::TerminalStatus { .. } => FailureKind::TerminalStatus,
            Self::ClientException { .. } => FailureKind::ClientException,
            Self::InvalidRequest(_) => FailureKind::InvalidRequest,
            Self::Decode(_) => FailureKind::Decode,
        }
    }

    /// Retry diagnostics, for failures that reached the network.
    pub fn trace(&self) -> Option<&RetryTrace> {
        match self {
            Self::NonJsonResponse { trace, .. }
            | Self::TerminalStatus { trace, .. }
            | Self::ClientException { trace, .. } => Some(trace),
            Self::InvalidRequest(_) | Self::Decode(_) => None,
        }
    }

    pub fn retried(&self) -> bool {
        self.trace().is_some_and(RetryTrace::retried)
    }

    /// HTTP status of the last response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NonJsonResponse { status, .. } | Self::TerminalStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
