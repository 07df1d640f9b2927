//! `edge-json-client` is an async JSON client for same-origin `/api/...`
//! endpoints served behind a CDN and an API gateway.
//!
//! Cold starts at the edge surface as an HTML error page or a 502/503/504
//! instead of the backend's JSON. The client masks that failure class with a
//! single bounded retry, and reports everything else on the first attempt:
//! - [`EdgeClient::get`]
//! - [`EdgeClient::post`]
//! - [`EdgeClient::request`] / [`EdgeClient::request_with`]
//!
//! Results carry a [`RetryTrace`]; [`status_line`] turns a result into text
//! for display.

mod classify;
mod client;
mod decode;
mod error;
mod options;
mod status;
mod types;
mod wire;

pub use classify::{classify, looks_like_html, Classification, RetryReason};
pub use client::EdgeClient;
pub use error::{EdgeJsonError, FailureKind};
pub use options::RequestOptions;
pub use status::status_line;
pub use types::{ApiRequest, AttemptOutcome, JsonResponse, Method, RetryTrace};

pub type Result<T> = std::result::Result<T, EdgeJsonError>;
