//! Wire types for the relay's own HTTP surface.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
///
/// `model` also decodes from the older `selectedModel` field name. Message
/// objects inside `contents` are relayed upstream untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub contents: Vec<serde_json::Value>,
    #[serde(default, alias = "selectedModel")]
    pub model: Option<String>,
    #[serde(default)]
    pub key_selection: Option<String>,
    #[serde(default)]
    pub custom_key: Option<String>,
}

/// Success envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReply {
    pub response_text: String,
}

/// Error envelope; every non-2xx reply uses this shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub version: &'static str,
}
