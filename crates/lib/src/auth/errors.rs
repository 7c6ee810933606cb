//! Error types for credential storage and resolution.

use thiserror::Error;

/// Errors that can occur while resolving or mutating stored credentials.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Lookup by username or id found no credential.
    #[error("User not found")]
    NotFound { name: String },

    /// No default account is configured to fall back to.
    #[error("No default user set")]
    NoDefault,

    /// The account is already the default.
    #[error("User {username} is already default")]
    AlreadyDefault { username: String },

    /// The stored session for the account has lapsed.
    #[error("Session for {username} is expired, log in again")]
    SessionExpired { username: String },
}

impl AuthError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthError::NotFound { .. } | AuthError::NoDefault)
    }
}
