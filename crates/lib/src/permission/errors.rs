//! Error types for the permission workflow.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PermissionError {
    /// The remote lookup of the target account came back empty.
    #[error("Target user not found: {name}")]
    TargetNotFound { name: String },

    /// Granting or revoking your own access is not allowed.
    #[error("Can't change permissions for yourself")]
    SelfTarget,

    /// Only READ and WRITE can be granted.
    #[error("Role must be READ or WRITE")]
    InvalidRole,
}
