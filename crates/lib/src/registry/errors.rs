//! Error types for loading and committing the persisted registry.

use std::path::PathBuf;

use thiserror::Error;

/// Errors around the two persisted files. Missing or corrupt files are fatal
/// at startup: auth and folder state are co-dependent and the client cannot
/// run on half of them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("Can't find configuration, searching {}", path.display())]
    MissingConfig { path: PathBuf },

    #[error("Can't find authorization configuration, searching {}", path.display())]
    MissingAuth { path: PathBuf },

    #[error("Unable to parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to save {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't resolve home directory")]
    NoHomeDir,
}

impl RegistryError {
    /// Whether the client cannot meaningfully continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RegistryError::MissingConfig { .. }
                | RegistryError::MissingAuth { .. }
                | RegistryError::Corrupt { .. }
        )
    }
}
