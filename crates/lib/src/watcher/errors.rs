//! Error types for local watch bindings.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatcherError {
    /// The candidate path overlaps an existing watcher's tree, in either
    /// direction.
    #[error("Path {path} is already watched through {existing}")]
    PathAlreadyWatched { path: String, existing: String },

    /// No watcher covers the given path.
    #[error("No watcher found for {path}")]
    NotFound { path: String },

    /// The user declined removing an ancestor watcher.
    #[error("Unwatch aborted")]
    Aborted,
}

impl WatcherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WatcherError::NotFound { .. })
    }
}
