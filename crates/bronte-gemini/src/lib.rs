//! Client for a generative-text HTTP upstream.
//!
//! Speaks the `generateContent` wire format: POST `{ contents }` to
//! `models/{model}:generateContent`, read back
//! `{ candidates: [{ content: { parts: [{ text }] } }] }`. Message objects in
//! `contents` are opaque to this crate; callers own prompt construction.

mod client;
mod error;
mod retry;
mod types;

pub use client::GeminiClient;
pub use error::{classify_status, UpstreamError};
pub use retry::{with_retry, RetryConfig, RetryExhausted};
pub use secrecy::SecretString;
pub use types::{first_candidate_text, Candidate, CandidateContent, GenerateRequest, GenerateResponse, Part};
