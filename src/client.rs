use std::time::Duration;

use reqwest::header;
use serde::Serialize;
use serde_json::Value;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{
    classify::{classify, looks_like_html},
    decode::{body_preview, error_message},
    ApiRequest, AttemptOutcome, Classification, EdgeJsonError, JsonResponse, Method,
    RequestOptions, Result, RetryReason, RetryTrace,
};

/// JSON client bound to a single origin.
///
/// Every call targets a path on that origin (`/api/...`). Transient
/// edge/gateway failures are retried according to [`RequestOptions`];
/// everything else is returned to the caller on the first attempt.
#[derive(Clone, Debug)]
pub struct EdgeClient {
    http: reqwest::Client,
    origin: String,
    options: RequestOptions,
}

impl EdgeClient {
    /// Creates a client for `origin`, e.g. `https://example.com`.
    ///
    /// A trailing slash on the origin is ignored.
    pub fn new(origin: impl AsRef<str>) -> Self {
        Self::with_http_client(origin, reqwest::Client::new())
    }

    /// Creates a client that reuses an existing `reqwest` client.
    pub fn with_http_client(origin: impl AsRef<str>, http: reqwest::Client) -> Self {
        Self {
            http,
            origin: normalize_origin(origin.as_ref()),
            options: RequestOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `EDGE_API_ORIGIN` (required) and the optional overrides listed on
    /// [`RequestOptions::from_env`].
    ///
    /// **Not available on `wasm32` targets** — pass `window.location.origin`
    /// to [`EdgeClient::new`] instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let origin = std::env::var("EDGE_API_ORIGIN")
            .map_err(|_| "missing EDGE_API_ORIGIN environment variable".to_owned())?;
        if origin.trim().is_empty() {
            return Err("EDGE_API_ORIGIN is set but empty".to_owned());
        }
        Ok(Self::new(origin).with_options(RequestOptions::from_env()?))
    }

    /// Applies default options for every call made through this client.
    pub fn with_options(mut self, opts: RequestOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Result<JsonResponse> {
        self.request(ApiRequest::get(path)).await
    }

    /// `POST path` with `body` serialized as JSON.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<JsonResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)
            .map_err(|err| EdgeJsonError::InvalidRequest(format!("body is not JSON-serializable: {err}")))?;
        self.request(ApiRequest::post(path, body)).await
    }

    /// Runs a request with the client's options.
    pub async fn request(&self, request: ApiRequest) -> Result<JsonResponse> {
        self.request_with(request, &self.options).await
    }

    /// Runs a request with per-call options.
    ///
    /// Makes at most `opts.max_attempts` network calls. Only attempts that
    /// classify as [`Classification::Retryable`] are repeated; transport
    /// failures return immediately as [`EdgeJsonError::ClientException`].
    pub async fn request_with(
        &self,
        request: ApiRequest,
        opts: &RequestOptions,
    ) -> Result<JsonResponse> {
        let url = resolve_url(&self.origin, &request.path)?;
        let budget = opts.attempt_budget();
        let mut trace = RetryTrace::default();

        loop {
            trace.attempts += 1;

            let outcome = match self.send_once(&url, &request, opts).await {
                Ok(outcome) => outcome,
                Err(source) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt = trace.attempts, error = %source, "request failed before a response");

                    return Err(EdgeJsonError::ClientException { source, trace });
                }
            };

            let classification = classify(&outcome, opts);
            if trace.attempts == 1 {
                trace.first = Some(classification);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                attempt = trace.attempts,
                status = outcome.status,
                classification = %classification,
                "attempt classified"
            );

            match classification {
                Classification::Valid => {
                    return Ok(JsonResponse {
                        status: outcome.status,
                        value: outcome.json.unwrap_or_default(),
                        trace,
                    });
                }
                Classification::Retryable(_) if trace.attempts < budget => {
                    self.wait_before_retry(opts).await;
                }
                Classification::Retryable(reason) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        path = %request.path,
                        attempts = trace.attempts,
                        status = outcome.status,
                        reason = reason.as_str(),
                        "retries exhausted"
                    );

                    return Err(exhausted_failure(outcome, reason, trace, opts));
                }
                Classification::Terminal => {
                    return Err(terminal_failure(outcome, trace, opts));
                }
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        request: &ApiRequest,
        opts: &RequestOptions,
    ) -> std::result::Result<AttemptOutcome, reqwest::Error> {
        let builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => {
                let body = request.body.clone().unwrap_or_else(|| Value::Object(Default::default()));
                self.http.post(url).json(&body)
            }
        };

        let mut builder = builder.header(header::ACCEPT, "application/json");
        // On WASM, reqwest uses AbortController for the timeout.
        if opts.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(opts.timeout_ms));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = response.text().await?;

        Ok(AttemptOutcome::new(status, content_type, body))
    }

    /// Waits the fixed retry delay without blocking the executor.
    ///
    /// On native targets: `tokio::time::sleep`.
    /// On WASM targets: a promise resolved by the host's `setTimeout`.
    async fn wait_before_retry(&self, opts: &RequestOptions) {
        let delay_ms = opts.retry_delay_ms;

        #[cfg(feature = "tracing")]
        tracing::debug!(delay_ms, "retrying request");

        #[cfg(not(target_arch = "wasm32"))]
        sleep(Duration::from_millis(delay_ms)).await;

        #[cfg(target_arch = "wasm32")]
        wasm_sleep(delay_ms).await;
    }
}

#[cfg(target_arch = "wasm32")]
async fn wasm_sleep(delay_ms: u64) {
    use wasm_bindgen::{JsCast, JsValue};

    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let set_timeout = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("setTimeout"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        match set_timeout {
            Some(set_timeout) => {
                let _ = set_timeout.call2(&JsValue::NULL, &resolve, &JsValue::from(delay));
            }
            // No timer in this host; retry immediately.
            None => {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

fn exhausted_failure(
    outcome: AttemptOutcome,
    reason: RetryReason,
    trace: RetryTrace,
    opts: &RequestOptions,
) -> EdgeJsonError {
    if outcome.json.is_none() || looks_like_html(&outcome.content_type, &outcome.body) {
        return EdgeJsonError::NonJsonResponse {
            status: outcome.status,
            body_preview: body_preview(&outcome.body, opts.preview_chars),
            content_type: outcome.content_type,
            reason,
            trace,
        };
    }
    terminal_failure(outcome, trace, opts)
}

fn terminal_failure(outcome: AttemptOutcome, trace: RetryTrace, opts: &RequestOptions) -> EdgeJsonError {
    let (message, code) = outcome
        .json
        .as_ref()
        .map(error_message)
        .unwrap_or_default();

    EdgeJsonError::TerminalStatus {
        status: outcome.status,
        message: message.unwrap_or_else(|| format!("HTTP {}", outcome.status)),
        code,
        body_preview: body_preview(&outcome.body, opts.preview_chars),
        content_type: outcome.content_type,
        trace,
    }
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_owned()
}

/// Joins an origin-absolute path onto the origin, rejecting anything that
/// could leave it.
fn resolve_url(origin: &str, path: &str) -> Result<String> {
    let leaves_origin = path.starts_with("//") || path.starts_with("/\\");
    if !path.starts_with('/') || leaves_origin {
        return Err(EdgeJsonError::InvalidRequest(format!(
            "path must be absolute on the client origin, got '{path}'"
        )));
    }
    Ok(format!("{origin}{path}"))
}
