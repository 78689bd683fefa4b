//! Relay configuration from environment variables.
//!
//! **Environment variables:**
//! - `PORT`: server port (default: 8787)
//! - `BRONTE_UPSTREAM_URL`: base URL of the generateContent upstream
//!   (default: https://generativelanguage.googleapis.com)
//! - `BRONTE_DEFAULT_MODEL`: model used when a request omits one (unset by default)
//! - `BRONTE_MAX_ATTEMPTS`: upstream attempts per request (default: 3)
//! - `REQUEST_TIMEOUT_SECS`: upstream request timeout (default: 120)
//!
//! Key material (`GEMINI_API_KEY`, `API_KEY_*`) is read separately by
//! [`crate::keys::KeyPool::from_env`].

use std::env;
use std::time::Duration;

use bronte_gemini::RetryConfig;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub upstream_url: String,
    pub default_model: Option<String>,
    pub max_attempts: u32,
    pub request_timeout_secs: u64,
    /// Backoff before the second upstream attempt. Not env-sourced; tests
    /// shrink it to keep retry paths fast.
    pub retry_base_delay: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8787),
            upstream_url: env::var("BRONTE_UPSTREAM_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            default_model: env::var("BRONTE_DEFAULT_MODEL")
                .ok()
                .filter(|model| !model.is_empty()),
            max_attempts: env::var("BRONTE_MAX_ATTEMPTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(120),
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl RelayConfig {
    /// Retry policy for upstream calls made on behalf of one request.
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: self.retry_base_delay,
        }
    }
}
