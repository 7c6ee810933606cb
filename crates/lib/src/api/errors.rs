//! Error types for the remote API collaborator.

use thiserror::Error;

/// Errors that can occur while talking to the sherry service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The service answered with a non-success status. `messages` carries the
    /// parsed error envelope (single- or multi-message).
    #[error("{}", messages.join("\n"))]
    Remote { status: u16, messages: Vec<String> },

    /// The request never produced a response.
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// The configured API URL cannot be parsed.
    #[error("Can't parse API URL: {url}")]
    InvalidUrl { url: String },

    /// A success response carried an unexpected body.
    #[error("Can't parse response: {reason}")]
    Decode { reason: String },
}

impl ApiError {
    /// Status code of a remote rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
