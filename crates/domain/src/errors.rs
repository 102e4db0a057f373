//! Error types used throughout the worker
//!
//! The `Display` output of [`HelpdeskError`] is the message delivered to the
//! remote caller, so the prefixes below are part of the wire contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::WORKER_UNAVAILABLE;
use crate::types::ListEndpoint;

/// Main error type for the helpdesk worker
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum HelpdeskError {
    #[error("ERR_API_VALIDATION: {0}")]
    Validation(String),

    #[error("ERR_API_ACTION: {0}")]
    Unavailable(String),

    #[error("ERR_API_HELPDESK_UNKNOWN: {0}")]
    UnknownTenant(String),

    #[error("ERR_API_ACTION: unsupported action '{0}'")]
    UnknownAction(String),

    #[error("ERR_API_HELPDESK_LIST_{code}: {detail}")]
    List { code: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HelpdeskError {
    /// Rejection issued by a paused tenant scheduler.
    pub fn unavailable() -> Self {
        Self::Unavailable(WORKER_UNAVAILABLE.to_string())
    }

    /// Failure of a fetch-all against `endpoint`.
    pub fn list(endpoint: ListEndpoint, detail: impl Into<String>) -> Self {
        Self::List { code: endpoint.error_code(), detail: detail.into() }
    }

    /// Stable label suitable for logs and response envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unavailable(_) => "unavailable",
            Self::UnknownTenant(_) => "unknown_tenant",
            Self::UnknownAction(_) => "unknown_action",
            Self::List { .. } => "upstream",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for worker operations
pub type Result<T> = std::result::Result<T, HelpdeskError>;
