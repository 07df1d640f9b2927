use serde::Deserialize;
use serde_json::Value;

/// Backend error body: `{"error": {"code": ..., "message": ...}}`,
/// `{"error": "text"}`, or any object with a top-level `message`.
///
/// Fields stay loosely typed so one odd field never hides the others.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Value,
    #[serde(default)]
    pub message: Value,
}
