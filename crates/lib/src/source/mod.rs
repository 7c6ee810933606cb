//! Local records of remote shared folders.
//!
//! A [`Source`] caches what one local account knows about one remote folder:
//! its sharing settings and the account's role on it. The same remote folder
//! may be known to several local accounts, so records are keyed by the
//! composite `(user, folder)` pair.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::api::types::RemoteFolder;
use crate::constants;
use crate::validate::{self, ValidationError};

pub mod errors;

pub use errors::SourceError;


/// Access role of a local account on a shared folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    #[serde(rename = "OWNER")]
    Owner,
    #[serde(rename = "READ")]
    Read,
    #[serde(rename = "WRITE")]
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Access::Owner => "OWNER",
            Access::Read => "READ",
            Access::Write => "WRITE",
        };
        f.write_str(tag)
    }
}

impl FromStr for Access {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Access::Owner),
            "READ" => Ok(Access::Read),
            "WRITE" => Ok(Access::Write),
            _ => Err(ValidationError::Unparsable {
                field: "role".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Composite key scoping one remote folder record to one local account.
/// Rendered `user:folder` when used as a JSON map key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceKey {
    pub user_id: String,
    pub folder_id: String,
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.folder_id)
    }
}

impl FromStr for SourceKey {
    type Err = SourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once(':') {
            Some((user_id, folder_id)) if !user_id.is_empty() && !folder_id.is_empty() => {
                Ok(SourceKey {
                    user_id: user_id.to_string(),
                    folder_id: folder_id.to_string(),
                })
            }
            _ => Err(SourceError::InvalidKey {
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for SourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Cached record of one remote shared folder as seen by one local account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Remote folder id.
    pub id: String,
    pub name: String,
    pub access: Access,
    pub owner_id: String,
    /// The local account this record is scoped to.
    pub user_id: String,
    pub allow_dir: bool,
    pub max_file_size: u64,
    pub max_dir_size: u64,
    #[serde(default)]
    pub allowed_file_names: Vec<String>,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
}

impl Source {
    pub fn key(&self) -> SourceKey {
        SourceKey {
            user_id: self.user_id.clone(),
            folder_id: self.id.clone(),
        }
    }
}

/// Fully resolved sharing settings for a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub allow_dir: bool,
    pub max_file_size: u64,
    pub max_dir_size: u64,
    pub allowed_file_names: Vec<String>,
    pub allowed_file_types: Vec<String>,
}

/// Partial settings patch parsed from `--set key=value` pairs.
///
/// Keys are case-normalized here, at the parse boundary, and nowhere else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub allow_dir: Option<bool>,
    pub max_file_size: Option<u64>,
    pub max_dir_size: Option<u64>,
    pub allowed_file_names: Option<Vec<String>>,
    pub allowed_file_types: Option<Vec<String>>,
}

impl SettingsPatch {
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ValidationError> {
        let mut patch = SettingsPatch::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.to_ascii_lowercase().as_str() {
                "allowdir" => patch.allow_dir = Some(validate::parse_bool("allowDir", value)?),
                "maxfilesize" => {
                    patch.max_file_size = Some(validate::parse_data_size(
                        "maxFileSize",
                        value,
                        constants::MAX_FILE_SIZE,
                    )?);
                }
                "maxdirsize" => {
                    patch.max_dir_size = Some(validate::parse_data_size(
                        "maxDirSize",
                        value,
                        constants::MAX_DIR_SIZE,
                    )?);
                }
                "allowedfilenames" => {
                    patch.allowed_file_names = Some(validate::parse_value_list(
                        "allowedFileNames",
                        value,
                        validate::is_glob,
                    )?);
                }
                "allowedfiletypes" => {
                    patch.allowed_file_types = Some(validate::parse_value_list(
                        "allowedFileTypes",
                        value,
                        validate::is_mime,
                    )?);
                }
                _ => {
                    return Err(ValidationError::UnknownSetting {
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(patch)
    }

    /// Create semantics: unspecified fields fall back to the global defaults.
    pub fn materialize(&self) -> SourceSettings {
        SourceSettings {
            allow_dir: self.allow_dir.unwrap_or(constants::DEFAULT_ALLOW_DIR),
            max_file_size: self.max_file_size.unwrap_or(constants::DEFAULT_MAX_FILE_SIZE),
            max_dir_size: self.max_dir_size.unwrap_or(constants::DEFAULT_MAX_DIR_SIZE),
            allowed_file_names: self.allowed_file_names.clone().unwrap_or_default(),
            allowed_file_types: self.allowed_file_types.clone().unwrap_or_default(),
        }
    }

    /// Update semantics: unspecified fields keep the source's current value,
    /// never a global default.
    pub fn apply_to(&self, source: &Source) -> SourceSettings {
        SourceSettings {
            allow_dir: self.allow_dir.unwrap_or(source.allow_dir),
            max_file_size: self.max_file_size.unwrap_or(source.max_file_size),
            max_dir_size: self.max_dir_size.unwrap_or(source.max_dir_size),
            allowed_file_names: self
                .allowed_file_names
                .clone()
                .unwrap_or_else(|| source.allowed_file_names.clone()),
            allowed_file_types: self
                .allowed_file_types
                .clone()
                .unwrap_or_else(|| source.allowed_file_types.clone()),
        }
    }
}

/// Registry of sources keyed by `(user, folder)`.
#[derive(Debug, Default, Clone)]
pub struct SourceRegistry {
    sources: BTreeMap<SourceKey, Source>,
    dirty: bool,
}

impl SourceRegistry {
    pub fn from_map(sources: BTreeMap<SourceKey, Source>) -> Self {
        SourceRegistry {
            sources,
            dirty: false,
        }
    }

    pub fn to_map(&self) -> BTreeMap<SourceKey, Source> {
        self.sources.clone()
    }

    pub fn get(&self, key: &SourceKey) -> Option<&Source> {
        self.sources.get(key)
    }

    /// Exact name match scoped to one account.
    pub fn find(&self, user_id: &str, name: &str) -> Option<&Source> {
        self.sources
            .values()
            .find(|s| s.user_id == user_id && s.name == name)
    }

    /// Like [`find`](Self::find), restricted to folders the account owns.
    pub fn find_owned_by(&self, user_id: &str, name: &str) -> Option<&Source> {
        self.sources
            .values()
            .find(|s| s.user_id == user_id && s.name == name && s.owner_id == user_id)
    }

    /// Map a remote folder description into a local record for `local_user_id`
    /// and store it. The role is owner when the account owns the folder, else
    /// the explicitly granted role from the permission list; a record without
    /// one is rejected as a protocol violation.
    pub fn upsert_from_remote(
        &mut self,
        folder: &RemoteFolder,
        local_user_id: &str,
    ) -> Result<SourceKey, SourceError> {
        let access = if folder.user_id == local_user_id {
            Access::Owner
        } else {
            let entry = folder
                .sherry_permission
                .iter()
                .find(|p| p.user_id == local_user_id)
                .ok_or_else(|| SourceError::ProtocolViolation {
                    folder_id: folder.sherry_id.clone(),
                    user_id: local_user_id.to_string(),
                })?;
            entry
                .role
                .parse()
                .map_err(|_| SourceError::ProtocolViolation {
                    folder_id: folder.sherry_id.clone(),
                    user_id: local_user_id.to_string(),
                })?
        };

        let source = Source {
            id: folder.sherry_id.clone(),
            name: folder.name.clone(),
            access,
            owner_id: folder.user_id.clone(),
            user_id: local_user_id.to_string(),
            allow_dir: folder.allow_dir,
            max_file_size: folder.max_file_size,
            max_dir_size: folder.max_dir_size,
            allowed_file_names: folder
                .allowed_file_names
                .iter()
                .map(|f| f.name.clone())
                .collect(),
            allowed_file_types: folder
                .allowed_file_types
                .iter()
                .map(|f| f.mime_type.clone())
                .collect(),
        };
        let key = source.key();
        self.sources.insert(key.clone(), source);
        self.dirty = true;
        Ok(key)
    }

    /// Write a settings patch back onto the stored source.
    pub fn apply_update(
        &mut self,
        key: &SourceKey,
        patch: &SettingsPatch,
    ) -> Result<&Source, SourceError> {
        let source = self
            .sources
            .get_mut(key)
            .ok_or_else(|| SourceError::NotFound {
                name: key.to_string(),
            })?;
        let settings = patch.apply_to(source);
        source.allow_dir = settings.allow_dir;
        source.max_file_size = settings.max_file_size;
        source.max_dir_size = settings.max_dir_size;
        source.allowed_file_names = settings.allowed_file_names;
        source.allowed_file_types = settings.allowed_file_types;
        self.dirty = true;
        Ok(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
