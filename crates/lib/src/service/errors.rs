//! Error types for sync service lifecycle management.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Service is already started, PID: {pid}")]
    AlreadyRunning { pid: u32 },

    #[error("Service is not started")]
    NotRunning,

    /// No spawn strategy exists for this platform.
    #[error("Service management is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Failed to start service: {reason}")]
    SpawnFailed { reason: String },

    #[error("Failed to stop service: {reason}")]
    StopFailed { reason: String },

    #[error("Invalid PID file: {content:?}")]
    InvalidPid { content: String },
}
