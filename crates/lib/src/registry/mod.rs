//! The persisted client registry and its commit discipline.
//!
//! [`RegistryStore`] owns the whole in-memory state for one CLI invocation:
//! credentials, shared-folder sources and watch bindings. All mutation goes
//! through the component stores, and nothing reaches disk unless the whole
//! command succeeds: [`RegistryStore::run_command`] commits both files
//! together, or neither.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{AuthorizationConfig, CredentialStore};
use crate::constants;
use crate::source::{Source, SourceKey, SourceRegistry};
use crate::watcher::{Watcher, WatcherSet};
use crate::{Error, Result};

pub mod errors;

pub use errors::RegistryError;


/// Persisted form of the folder/watcher state (`config.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_url: String,
    pub socket_url: String,
    pub sources: BTreeMap<SourceKey, Source>,
    pub watchers: Vec<Watcher>,
    pub webhooks: Vec<String>,
}

/// Resolve the configuration directory: explicit override, then the
/// `SHERRY_CONFIG_DIR` environment variable, then `~/.sherry`.
pub fn resolve_config_dir(overwrite: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = overwrite {
        return Ok(dir.to_path_buf());
    }
    match std::env::var(constants::CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => return Ok(PathBuf::from(dir)),
        _ => {}
    }
    let home = dirs::home_dir().ok_or(RegistryError::NoHomeDir)?;
    Ok(home.join(constants::CONFIG_DIR_NAME))
}

/// The aggregate state of one CLI invocation.
#[derive(Debug)]
pub struct RegistryStore {
    dir: PathBuf,
    api_url: String,
    socket_url: String,
    webhooks: Vec<String>,
    credentials: CredentialStore,
    sources: SourceRegistry,
    watchers: WatcherSet,
}

impl RegistryStore {
    /// Read both persisted files. Either one missing or unparsable is fatal.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(constants::CONFIG_FILE);
        let raw = fs::read_to_string(&config_path).map_err(|_| RegistryError::MissingConfig {
            path: dir.to_path_buf(),
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| RegistryError::Corrupt {
            path: config_path,
            source,
        })?;

        let auth_path = dir.join(constants::AUTH_FILE);
        let raw = fs::read_to_string(&auth_path).map_err(|_| RegistryError::MissingAuth {
            path: dir.to_path_buf(),
        })?;
        let auth: AuthorizationConfig =
            serde_json::from_str(&raw).map_err(|source| RegistryError::Corrupt {
                path: auth_path,
                source,
            })?;

        Ok(Self::from_parts(dir.to_path_buf(), config, auth))
    }

    pub fn from_parts(dir: PathBuf, config: Config, auth: AuthorizationConfig) -> Self {
        RegistryStore {
            dir,
            api_url: config.api_url,
            socket_url: config.socket_url,
            webhooks: config.webhooks,
            credentials: CredentialStore::from_config(auth),
            sources: SourceRegistry::from_map(config.sources),
            watchers: WatcherSet::from_vec(config.watchers),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn socket_url(&self) -> &str {
        &self.socket_url
    }

    pub fn webhooks(&self) -> &[String] {
        &self.webhooks
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut CredentialStore {
        &mut self.credentials
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut SourceRegistry {
        &mut self.sources
    }

    pub fn watchers(&self) -> &WatcherSet {
        &self.watchers
    }

    pub fn watchers_mut(&mut self) -> &mut WatcherSet {
        &mut self.watchers
    }

    fn is_dirty(&self) -> bool {
        self.credentials.is_dirty() || self.sources.is_dirty() || self.watchers.is_dirty()
    }

    /// Run one command against the registry. The persisted files are
    /// rewritten if and only if `action` returns `Ok`; any error leaves the
    /// disk state untouched, no matter what was mutated in memory.
    pub async fn run_command<F>(&mut self, action: F) -> Result<()>
    where
        F: AsyncFnOnce(&mut RegistryStore) -> Result<()>,
    {
        action(self).await?;
        if self.is_dirty() {
            self.commit()?;
        }
        Ok(())
    }

    /// Serialize both aggregates to their files. Both are staged as temp
    /// files before either is renamed into place, so a failed write leaves
    /// the previous state intact.
    pub fn commit(&mut self) -> Result<()> {
        let config = self.to_config();
        let auth = self.credentials.to_config();
        let config_path = self.dir.join(constants::CONFIG_FILE);
        let auth_path = self.dir.join(constants::AUTH_FILE);

        let config_tmp = stage(&config_path, &config)?;
        let auth_tmp = match stage(&auth_path, &auth) {
            Ok(path) => path,
            Err(e) => {
                let _ = fs::remove_file(&config_tmp);
                return Err(e);
            }
        };

        rename(&config_tmp, &config_path)?;
        rename(&auth_tmp, &auth_path)?;

        self.credentials.clear_dirty();
        self.sources.clear_dirty();
        self.watchers.clear_dirty();
        debug!(dir = %self.dir.display(), "registry committed");
        Ok(())
    }

    pub fn to_config(&self) -> Config {
        Config {
            api_url: self.api_url.clone(),
            socket_url: self.socket_url.clone(),
            sources: self.sources.to_map(),
            watchers: self.watchers.to_vec(),
            webhooks: self.webhooks.clone(),
        }
    }
}

fn stage<T: Serialize>(target: &Path, value: &T) -> Result<PathBuf> {
    let tmp = target.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(value).map_err(Error::Serialize)?;
    fs::write(&tmp, data).map_err(|source| RegistryError::WriteFailed {
        path: tmp.clone(),
        source,
    })?;
    Ok(tmp)
}

fn rename(tmp: &Path, target: &Path) -> Result<()> {
    fs::rename(tmp, target).map_err(|source| {
        RegistryError::WriteFailed {
            path: target.to_path_buf(),
            source,
        }
        .into()
    })
}
