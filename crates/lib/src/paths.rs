//! Canonical path handling for watch bindings.
//!
//! Watcher paths are compared for ancestor/descendant relationships, so every
//! path entering the registry is first normalized to a canonical absolute form
//! with `/` separators. Comparison is component-wise; two siblings sharing a
//! string prefix (`/data` vs `/data2`) are never related.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while normalizing a user-supplied path.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PathError {
    #[error("Invalid path {path:?}: {reason}")]
    Invalid { path: String, reason: String },
}

/// An absolute, lexically normalized path with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `other` equals this path or lies inside its subtree.
    pub fn is_ancestor_or_equal(&self, other: &CanonicalPath) -> bool {
        Path::new(&other.0).starts_with(Path::new(&self.0))
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Resolve `raw` against the current directory and collapse `.`/`..`
/// components. The path does not have to exist.
pub fn canonicalize(raw: impl AsRef<Path>) -> Result<CanonicalPath, PathError> {
    let raw = raw.as_ref();
    if raw.as_os_str().is_empty() {
        return Err(PathError::Invalid {
            path: String::new(),
            reason: "empty path".to_string(),
        });
    }

    let absolute = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| PathError::Invalid {
            path: raw.display().to_string(),
            reason: e.to_string(),
        })?;
        cwd.join(raw)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    let text = normalized
        .to_str()
        .ok_or_else(|| PathError::Invalid {
            path: absolute.display().to_string(),
            reason: "path is not valid UTF-8".to_string(),
        })?
        .replace('\\', "/");
    Ok(CanonicalPath(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(raw: &str) -> CanonicalPath {
        canonicalize(raw).expect("canonicalize")
    }

    #[test]
    fn collapses_dot_and_dot_dot() {
        assert_eq!(canonical("/home/u/./docs").as_str(), "/home/u/docs");
        assert_eq!(canonical("/home/u/tmp/../docs").as_str(), "/home/u/docs");
        assert_eq!(canonical("/home/u/a/b/../../docs").as_str(), "/home/u/docs");
    }

    #[test]
    fn dot_dot_stops_at_root() {
        assert_eq!(canonical("/../..").as_str(), "/");
    }

    #[test]
    fn resolves_relative_against_cwd() {
        let cwd = std::env::current_dir().expect("cwd");
        let expected = canonicalize(cwd.join("some/dir")).expect("canonicalize");
        assert_eq!(canonical("some/./dir"), expected);
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(canonicalize("").is_err());
    }

    #[test]
    fn ancestor_includes_equality_and_subtrees() {
        let root = canonical("/home/u/docs");
        assert!(root.is_ancestor_or_equal(&canonical("/home/u/docs")));
        assert!(root.is_ancestor_or_equal(&canonical("/home/u/docs/sub/deep")));
        assert!(!root.is_ancestor_or_equal(&canonical("/home/u")));
    }

    #[test]
    fn sibling_prefix_is_not_a_descendant() {
        let data = canonical("/data");
        assert!(!data.is_ancestor_or_equal(&canonical("/data2")));
        assert!(!canonical("/data2").is_ancestor_or_equal(&data));
    }
}
