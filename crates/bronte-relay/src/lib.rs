//! Bronte Relay - HTTP relay in front of a generateContent upstream.
//!
//! Browser clients call `POST /api/generate`; the relay owns the API keys,
//! picks one per request, forwards the conversation upstream and retries
//! transient failures before answering with either `{ "responseText": ... }`
//! or `{ "error": ... }`.
//!
//! Design goals:
//! - Keep key material server-side; requests select a key, they never see one.
//! - Preserve the upstream's HTTP status when all attempts fail with one.
//! - Treat an OK-but-empty upstream reply as transient, like a 503.

pub mod config;
pub mod error;
pub mod keys;
pub mod server;
pub mod types;

pub use config::RelayConfig;
pub use error::RelayError;
pub use keys::{resolve_key, KeyError, KeyPool, KeySource, ResolvedKey};
pub use server::RelayServer;
