//! Wire types for the generateContent API.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
///
/// `contents` is relayed as-is; the individual message objects are opaque at
/// this layer.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub contents: &'a [serde_json::Value],
}

/// Response body for a successful generateContent call.
///
/// Every level is `#[serde(default)]` so a structurally thin payload decodes
/// to empty collections instead of failing; [`first_candidate_text`] then
/// reports the absence.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: CandidateContent,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part. Non-text parts (function calls etc.) decode with
/// `text: None` and count as unusable.
#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// Text of the first content part of the first candidate, if any.
///
/// A present-but-empty string counts as unusable, so a "200 OK but empty"
/// upstream reply is surfaced as an absence rather than an empty answer.
pub fn first_candidate_text(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .parts
        .first()?
        .text
        .as_deref()
        .filter(|text| !text.is_empty())
}
