//! API-specific error types
//!
//! Transport failures stay in [`ApiError`] inside this crate and become a
//! single `HelpdeskError::List` at the fetch-all boundary.

use helpdesk_domain::{HelpdeskError, ListEndpoint};
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Connection failures and timeouts
    Network,
    /// 5xx responses
    Server,
    /// 4xx responses, including rejected signatures
    Client,
    /// Response arrived but could not be used
    Response,
    /// Local setup problems (bad URL, unusable key)
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("pagination exceeded {0} pages")]
    TooManyPages(usize),

    #[error("request signing failed: {0}")]
    Signing(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Status { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Status { .. } => ApiErrorCategory::Client,
            Self::Decode(_) | Self::Shape(_) | Self::TooManyPages(_) => ApiErrorCategory::Response,
            Self::Signing(_) | Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Wrap as the caller-facing failure of a fetch-all against `endpoint`.
    pub fn into_list_error(self, endpoint: ListEndpoint) -> HelpdeskError {
        HelpdeskError::list(endpoint, self.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status { status: status.as_u16(), body: err.to_string() }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
