//! Sherry client core.
//!
//! This library holds the local state registry behind the `shr` CLI: the
//! accounts a user has authenticated ([`auth`]), the remote shared folders
//! those accounts know about ([`source`]), and the bindings between local
//! directories and those folders ([`watcher`]) that the separately-running
//! sync service consumes.
//!
//! The two pieces with real invariants live here:
//!
//! * No two watched paths may overlap (equality included), enforced by
//!   [`watcher::WatcherSet`] on top of [`paths`].
//! * Nothing is persisted unless a whole command succeeds. Both state files
//!   (`config.json` and `auth.json`) are committed together by
//!   [`registry::RegistryStore::run_command`], or not at all.
//!
//! Everything the core depends on but does not implement (the remote HTTP
//! API, interactive prompting, the sync daemon process) sits behind
//! collaborator seams: [`api::Api`], callback parameters,
//! [`service::ServiceHandle`].

pub mod api;
pub mod auth;
pub mod constants;
pub mod paths;
pub mod permission;
pub mod registry;
pub mod service;
pub mod source;
pub mod validate;
pub mod watcher;

pub use registry::RegistryStore;

/// Result type used throughout the sherry library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type aggregating the per-module errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Path(#[from] paths::PathError),

    #[error(transparent)]
    Validation(#[from] validate::ValidationError),

    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    #[error(transparent)]
    Source(#[from] source::SourceError),

    #[error(transparent)]
    Watcher(#[from] watcher::WatcherError),

    #[error(transparent)]
    Registry(#[from] registry::RegistryError),

    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Permission(#[from] permission::PermissionError),

    #[error(transparent)]
    Service(#[from] service::ServiceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Path(_) => "paths",
            Error::Validation(_) => "validate",
            Error::Auth(_) => "auth",
            Error::Source(_) => "source",
            Error::Watcher(_) => "watcher",
            Error::Registry(_) => "registry",
            Error::Api(_) => "api",
            Error::Permission(_) => "permission",
            Error::Service(_) => "service",
        }
    }

    /// Check if this error indicates a lookup miss.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Auth(e) => e.is_not_found(),
            Error::Source(e) => e.is_not_found(),
            Error::Watcher(e) => e.is_not_found(),
            Error::Permission(e) => {
                matches!(e, permission::PermissionError::TargetNotFound { .. })
            }
            _ => false,
        }
    }

    /// Check if this error is a conflict with existing state.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Auth(e) => matches!(e, auth::AuthError::AlreadyDefault { .. }),
            Error::Watcher(e) => {
                matches!(e, watcher::WatcherError::PathAlreadyWatched { .. })
            }
            Error::Permission(e) => matches!(e, permission::PermissionError::SelfTarget),
            Error::Service(e) => matches!(e, service::ServiceError::AlreadyRunning { .. }),
            _ => false,
        }
    }

    /// Check if this error is a declined confirmation.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Watcher(watcher::WatcherError::Aborted))
    }

    /// Check if this error means the persisted state is unusable and the
    /// process cannot continue.
    pub fn is_fatal_config(&self) -> bool {
        matches!(self, Error::Registry(e) if e.is_fatal())
    }
}
