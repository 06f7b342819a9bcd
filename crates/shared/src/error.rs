use thiserror::Error;

use crate::models::{ErrorBody, MarkerId};

/// Local form validation failures. Never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,
    #[error("unknown marker type: {0}")]
    UnknownType(String),
    /// The server refused the marker (400/422) with this reason.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("network error: {0}")]
    Network(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("marker {0} no longer exists")]
    NotFound(MarkerId),
}

impl MapError {
    /// Map a failed HTTP response to an error kind.
    ///
    /// `id` is the marker the request addressed, if any. `body` is the raw
    /// response body; a `{"detail": ...}` body supplies the message.
    pub fn from_response(status: u16, id: Option<&MarkerId>, body: &str) -> MapError {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        match (status, id) {
            (400, _) | (422, _) => MapError::Validation(ValidationError::Rejected(detail)),
            (401, _) | (403, _) => MapError::Permission(detail),
            (404, Some(id)) => MapError::NotFound(id.clone()),
            _ => MapError::Network(detail),
        }
    }

    /// Whether resubmitting the same request can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MapError::Network(_))
    }

    /// Whether the marker cache must be resynchronized after this error.
    pub fn requires_reload(&self) -> bool {
        matches!(self, MapError::NotFound(_))
    }
}
