//! Credential records for authenticated remote accounts.
//!
//! One [`Credential`] is held per remote account the user has logged into.
//! The store designates one account as the default, used whenever a command
//! does not name an account explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::types::LoginResponse;

pub mod errors;

pub use errors::AuthError;

#[cfg(test)]
mod tests;

/// A stored remote session: identity plus tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
    /// Flipped by the sync service when the remote session lapses; never
    /// derived locally.
    #[serde(default)]
    pub expired: bool,
}

impl From<LoginResponse> for Credential {
    fn from(response: LoginResponse) -> Self {
        Credential {
            user_id: response.user_id,
            email: response.email,
            username: response.username,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            expired: false,
        }
    }
}

/// Persisted form of the credential store (`auth.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    #[serde(rename = "records", default)]
    pub sources: BTreeMap<String, Credential>,
    /// User id of the default account, empty when unset. When non-empty it
    /// must key an entry in `sources`.
    #[serde(default)]
    pub default: String,
}

/// In-memory store of authenticated accounts, keyed by remote user id.
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    records: BTreeMap<String, Credential>,
    default: String,
    dirty: bool,
}

impl CredentialStore {
    pub fn from_config(config: AuthorizationConfig) -> Self {
        CredentialStore {
            records: config.sources,
            default: config.default,
            dirty: false,
        }
    }

    pub fn to_config(&self) -> AuthorizationConfig {
        AuthorizationConfig {
            sources: self.records.clone(),
            default: self.default.clone(),
        }
    }

    /// Resolve a user-supplied name to a credential. An empty name resolves
    /// the default account when `allow_default` is set; otherwise the lookup
    /// is an exact username match, first match winning (duplicate usernames
    /// are prevented upstream at registration time).
    pub fn resolve(&self, name: &str, allow_default: bool) -> Result<&Credential, AuthError> {
        if name.is_empty() {
            if !allow_default {
                return Err(AuthError::NotFound {
                    name: String::new(),
                });
            }
            if self.default.is_empty() {
                return Err(AuthError::NoDefault);
            }
            return self.records.get(&self.default).ok_or(AuthError::NoDefault);
        }
        self.records
            .values()
            .find(|c| c.username == name)
            .ok_or_else(|| AuthError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn get_by_id(&self, user_id: &str) -> Result<&Credential, AuthError> {
        self.records.get(user_id).ok_or_else(|| AuthError::NotFound {
            name: user_id.to_string(),
        })
    }

    /// Insert or replace a credential. The first credential ever added
    /// becomes the default account.
    pub fn upsert(&mut self, credential: Credential) {
        let user_id = credential.user_id.clone();
        self.records.insert(user_id.clone(), credential);
        if self.default.is_empty() && self.records.len() == 1 {
            self.default = user_id;
        }
        self.dirty = true;
    }

    /// Make `username` the default account. Setting the current default
    /// again is reported as [`AuthError::AlreadyDefault`], not a no-op.
    pub fn set_default(&mut self, username: &str) -> Result<&Credential, AuthError> {
        let user_id = self
            .records
            .values()
            .find(|c| c.username == username)
            .map(|c| c.user_id.clone())
            .ok_or_else(|| AuthError::NotFound {
                name: username.to_string(),
            })?;
        if self.default == user_id {
            return Err(AuthError::AlreadyDefault {
                username: username.to_string(),
            });
        }
        self.default = user_id.clone();
        self.dirty = true;
        self.get_by_id(&user_id)
    }

    pub fn default_credential(&self) -> Option<&Credential> {
        if self.default.is_empty() {
            return None;
        }
        self.records.get(&self.default)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
