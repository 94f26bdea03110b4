//! Error taxonomy for upstream data access.

use thiserror::Error;

/// Errors surfaced by the market-data layer.
///
/// `Network` and `MalformedResponse` are retryable: the fetch layer backs off
/// and eventually degrades to synthetic fallback data instead of failing.
/// `RateLimited` maps HTTP 429, an expected upstream condition rather than a
/// generic failure. `Cancelled` is the cooperative stop signal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by upstream")]
    RateLimited,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether the fetch layer should retry this failure with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Network(_) | FetchError::RateLimited | FetchError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.status().map(|s| s.as_u16() == 429).unwrap_or(false) {
            FetchError::RateLimited
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
