use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::{classify_status, UpstreamError};
use crate::types::{GenerateRequest, GenerateResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for the generateContent endpoint.
///
/// The API key travels in the `x-goog-api-key` header, never in the URL, so
/// it cannot leak through request logs.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the client at a different upstream, e.g. a test server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// One generateContent call. Retry lives with the caller.
    pub async fn generate(
        &self,
        model: &str,
        key: &SecretString,
        contents: &[serde_json::Value],
    ) -> Result<GenerateResponse, UpstreamError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        debug!(model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key.expose_secret())
            .json(&GenerateRequest { contents })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(classify_status(status.as_u16(), message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| UpstreamError::InvalidPayload(err.to_string()))
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Best-effort extraction of the upstream error message: the
/// `{ "error": { "message" } }` shape if it parses, otherwise the raw body,
/// otherwise a status line.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&body) {
        if let Some(message) = parsed.error.message {
            if !message.is_empty() {
                return message;
            }
        }
    }
    if !body.trim().is_empty() {
        return body;
    }
    format!("HTTP {status}")
}
