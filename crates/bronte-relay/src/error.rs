use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bronte_gemini::RetryExhausted;
use thiserror::Error;

use crate::keys::KeyError;
use crate::types::ErrorBody;

/// Everything `POST /api/generate` can fail with. Each variant renders as the
/// `{ "error": ... }` envelope with the status from [`RelayError::status_code`].
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method not allowed; use POST")]
    MethodNotAllowed,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("contents is required and must be a non-empty array")]
    MissingContents,

    #[error("model is required")]
    MissingModel,

    #[error("server configuration error: API key not found")]
    MissingServerKey,

    #[error("no valid API key after checking all sources")]
    NoUsableKey,

    #[error("server error: {0}")]
    Server(String),

    #[error(transparent)]
    Upstream(#[from] RetryExhausted),
}

impl From<KeyError> for RelayError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::MissingDefault => RelayError::MissingServerKey,
            KeyError::Unusable => RelayError::NoUsableKey,
        }
    }
}

impl RelayError {
    /// Upstream failures keep the upstream's HTTP status when it had one;
    /// transport and decode failures surface as 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidBody(_) | RelayError::MissingContents | RelayError::MissingModel => {
                StatusCode::BAD_REQUEST
            }
            RelayError::MissingServerKey | RelayError::NoUsableKey | RelayError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Upstream(exhausted) => exhausted
                .last
                .status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
