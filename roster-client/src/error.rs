//! Client error types

use shared::{EmployeeId, ValidationErrors};
use std::fmt;
use thiserror::Error;

/// Normalized transport failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, cross-origin rejection, ...
    NetworkUnreachable,
    /// The backend answered with a non-2xx status or `success: false`
    Rejected(u16),
    /// No answer within the request budget
    Timeout,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnreachable => f.write_str("network unreachable"),
            Self::Rejected(status) => write!(f, "rejected ({status})"),
            Self::Timeout => f.write_str("timeout"),
        }
    }
}

/// Transport-level failure, independent of the HTTP library in use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    /// Backend message, or a fallback when the backend sent none
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn network_unreachable(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::NetworkUnreachable, detail)
    }

    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Rejected(status), detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, detail)
    }

    /// HTTP status for `Rejected`
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            TransportErrorKind::Rejected(status) => Some(status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(http::StatusCode::NOT_FOUND.as_u16())
    }

    /// Replace an empty detail with `fallback`
    pub fn or_detail(mut self, fallback: &str) -> Self {
        if self.detail.trim().is_empty() {
            self.detail = fallback.to_string();
        }
        self
    }
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local validation failed, nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Request failed at the transport level or was rejected by the backend
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Lookup by id found nothing
    #[error("Employee {id} not found: {detail}")]
    NotFound { id: EmployeeId, detail: String },

    /// Envelope missing or malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Single message suitable for a toast or status line
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please correct the highlighted fields".to_string(),
            Self::Transport(e) => e.detail.clone(),
            Self::NotFound { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::Transport(e) => Some(e.kind),
            Self::NotFound { .. } => Some(TransportErrorKind::Rejected(404)),
            _ => None,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
