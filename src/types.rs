use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Classification, EdgeJsonError, Result};

/// HTTP method accepted by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logical request against the client's origin.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path on the origin, e.g. `/api/health`.
    pub path: String,
    /// JSON body, only sent for `POST`.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// What one network call produced.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptOutcome {
    pub status: u16,
    /// Raw `Content-Type` header, empty when absent.
    pub content_type: String,
    pub body: String,
    /// Best-effort parse of `body`.
    pub json: Option<Value>,
}

impl AttemptOutcome {
    /// Builds an outcome from raw parts, parsing the body leniently.
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let json = crate::decode::parse_json_body(&body);
        Self {
            status,
            content_type: content_type.into(),
            body,
            json,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retry diagnostics attached to every result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryTrace {
    /// Network calls made for this logical request.
    pub attempts: usize,
    /// Classification of the first attempt; `None` when it never got a response.
    pub first: Option<Classification>,
}

impl RetryTrace {
    pub fn retried(&self) -> bool {
        self.attempts > 1
    }
}

/// Successful JSON response.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonResponse {
    pub status: u16,
    pub value: Value,
    pub trace: RetryTrace,
}

impl JsonResponse {
    pub fn retried(&self) -> bool {
        self.trace.retried()
    }

    /// Deserializes the payload into a caller type.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.value)
            .map_err(|err| EdgeJsonError::Decode(format!("unexpected payload shape: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::{ApiRequest, AttemptOutcome, JsonResponse, Method, RetryTrace};

    #[test]
    fn request_constructors() {
        let get = ApiRequest::get("/api/health");
        let post = ApiRequest::post("/api/runbooks/ask", json!({"question": "hello"}));
        assert_eq!(get.method, Method::Get);
        assert!(get.body.is_none());
        assert_eq!(post.method.to_string(), "POST");
        assert!(post.body.is_some());
    }

    #[test]
    fn outcome_parses_leniently() {
        let ok = AttemptOutcome::new(200, "application/json", r#"{"answer":"ok"}"#);
        let html = AttemptOutcome::new(504, "text/html", "<html></html>");
        assert!(ok.json.is_some());
        assert!(ok.is_success());
        assert!(html.json.is_none());
        assert!(!html.is_success());
    }

    #[test]
    fn typed_payload_access() {
        #[derive(Deserialize)]
        struct Answer {
            answer: String,
        }

        let response = JsonResponse {
            status: 200,
            value: json!({"answer": "ok"}),
            trace: RetryTrace::default(),
        };
        let answer: Answer = response.json().expect("must deserialize");
        assert_eq!(answer.answer, "ok");
    }
}
