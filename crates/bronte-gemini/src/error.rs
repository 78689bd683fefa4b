use thiserror::Error;

/// Failure modes of a single upstream generateContent call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("rate limited (429): {message}")]
    RateLimited { message: String },

    #[error("upstream unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream returned no usable candidate text")]
    EmptyCandidates,

    #[error("network error calling upstream: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode upstream response: {0}")]
    InvalidPayload(String),
}

impl UpstreamError {
    /// Whether another attempt has a chance of succeeding.
    ///
    /// Rate limiting and 500/503 are transient by contract; an empty candidate
    /// list on an otherwise-OK response is treated the same way. Everything
    /// else is terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::RateLimited { .. }
                | UpstreamError::Unavailable { .. }
                | UpstreamError::EmptyCandidates
        )
    }

    /// The upstream HTTP status this error carries, if it carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::RateLimited { .. } => Some(429),
            UpstreamError::Unavailable { status, .. } => Some(*status),
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Maps a non-success upstream status to its error variant.
pub fn classify_status(status: u16, message: String) -> UpstreamError {
    match status {
        429 => UpstreamError::RateLimited { message },
        500 | 503 => UpstreamError::Unavailable { status, message },
        _ => UpstreamError::Status { status, message },
    }
}
