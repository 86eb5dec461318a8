//! Internal error types for backend requests.
//!
//! Mapped to `BackendPortError` at the port boundary; only construction
//! failures reach callers as `HttpError`.

use thiserror::Error;

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    /// The backend answered with a non-success status.
    #[error("Backend request failed with status {status}: {url}")]
    Status {
        status: u16,
        url: String,
        /// The `error` field of a JSON body, when present.
        message: Option<String>,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl HttpError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
