//! Bindings between local directories and shared-folder sources.
//!
//! A [`Watcher`] marks one canonical local directory as the sync target of
//! one [`Source`](crate::source::Source). The set enforces the registry's
//! central invariant: no two watched paths may stand in an
//! ancestor/descendant relationship, equality included. The sync service
//! walks watched trees recursively, so an overlap would make two watchers
//! fight over the same files.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::paths::CanonicalPath;
use crate::source::SourceKey;

pub mod errors;

pub use errors::WatcherError;


/// One local-path ↔ source binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watcher {
    pub source: SourceKey,
    pub local_path: CanonicalPath,
    /// Opaque sync-session token consumed by the sync service.
    pub hashes_id: String,
    pub user_id: String,
    /// Whether the initial population of the directory has finished. Flipped
    /// by the sync service, never locally.
    #[serde(default)]
    pub complete: bool,
}

impl Watcher {
    /// Create a binding with a fresh sync-session token derived from the
    /// account, the remote folder and the creation time.
    pub fn new(source: SourceKey, local_path: CanonicalPath, user_id: String) -> Self {
        let hashes_id = derive_hashes_id(
            &user_id,
            &source.folder_id,
            chrono::Utc::now().timestamp_millis(),
        );
        Watcher {
            source,
            local_path,
            hashes_id,
            user_id,
            complete: false,
        }
    }
}

fn derive_hashes_id(user_id: &str, folder_id: &str, millis: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(folder_id.as_bytes());
    hasher.update(b":");
    hasher.update(millis.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// The set of active watch bindings.
#[derive(Debug, Default, Clone)]
pub struct WatcherSet {
    watchers: Vec<Watcher>,
    dirty: bool,
}

impl WatcherSet {
    pub fn from_vec(watchers: Vec<Watcher>) -> Self {
        WatcherSet {
            watchers,
            dirty: false,
        }
    }

    pub fn to_vec(&self) -> Vec<Watcher> {
        self.watchers.clone()
    }

    /// Reject `candidate` when it equals, contains or is contained by any
    /// watched path.
    pub fn check_no_overlap(&self, candidate: &CanonicalPath) -> Result<(), WatcherError> {
        for watcher in &self.watchers {
            if watcher.local_path.is_ancestor_or_equal(candidate)
                || candidate.is_ancestor_or_equal(&watcher.local_path)
            {
                return Err(WatcherError::PathAlreadyWatched {
                    path: candidate.to_string(),
                    existing: watcher.local_path.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn add(&mut self, watcher: Watcher) -> Result<(), WatcherError> {
        self.check_no_overlap(&watcher.local_path)?;
        self.watchers.push(watcher);
        self.dirty = true;
        Ok(())
    }

    /// Remove the watcher whose path is an ancestor of (or equal to) `path`.
    ///
    /// When the match is a strict ancestor the user is unwatching from a
    /// subdirectory; `confirm` decides whether the whole binding goes. A
    /// declined confirmation leaves the set unchanged.
    pub fn remove_by_path(
        &mut self,
        path: &CanonicalPath,
        confirm: impl FnOnce(&Watcher) -> bool,
    ) -> Result<Watcher, WatcherError> {
        let index = self
            .watchers
            .iter()
            .position(|w| w.local_path.is_ancestor_or_equal(path))
            .ok_or_else(|| WatcherError::NotFound {
                path: path.to_string(),
            })?;
        if self.watchers[index].local_path != *path && !confirm(&self.watchers[index]) {
            return Err(WatcherError::Aborted);
        }
        self.dirty = true;
        Ok(self.watchers.remove(index))
    }

    pub fn find_by_source(&self, key: &SourceKey) -> Vec<&Watcher> {
        self.watchers.iter().filter(|w| &w.source == key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Watcher> {
        self.watchers.iter()
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
