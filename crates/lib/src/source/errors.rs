//! Error types for the shared-folder source registry.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// No source with that name is known to the account.
    #[error("Source not found")]
    NotFound { name: String },

    /// The service returned a folder record with no usable permission entry
    /// for the local account. This is a contract violation on the remote
    /// side, not a local bug.
    #[error("Remote folder {folder_id} carries no permission entry for user {user_id}")]
    ProtocolViolation { folder_id: String, user_id: String },

    /// A composite source key that is not of the `user:folder` form.
    #[error("Invalid source key: {value:?}")]
    InvalidKey { value: String },
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}
