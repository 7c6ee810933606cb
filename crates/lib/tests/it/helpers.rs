//! Shared fixtures for the integration suite.

use std::fs;
use std::path::Path;

use sherry::api::types::{RemoteFolder, RemotePermission};
use sherry::auth::Credential;
use sherry::constants;
use sherry::RegistryStore;
use tempfile::TempDir;

/// Create a config directory seeded with empty, valid state files.
pub fn seeded_dir() -> TempDir {
    let tmp = TempDir::new().expect("create temp dir");
    fs::write(
        tmp.path().join(constants::CONFIG_FILE),
        r#"{
  "apiUrl": "http://localhost:3000",
  "socketUrl": "ws://localhost:3001",
  "sources": {},
  "watchers": [],
  "webhooks": []
}"#,
    )
    .expect("write config.json");
    fs::write(
        tmp.path().join(constants::AUTH_FILE),
        r#"{
  "records": {},
  "default": ""
}"#,
    )
    .expect("write auth.json");
    tmp
}

pub fn load(dir: &Path) -> RegistryStore {
    RegistryStore::load(dir).expect("load registry")
}

pub fn credential(user_id: &str, username: &str) -> Credential {
    Credential {
        user_id: user_id.to_string(),
        email: format!("{username}@example.com"),
        username: username.to_string(),
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_in: 3600,
        expired: false,
    }
}

pub fn remote_folder(folder_id: &str, name: &str, owner: &str, writers: &[&str]) -> RemoteFolder {
    RemoteFolder {
        sherry_id: folder_id.to_string(),
        name: name.to_string(),
        max_file_size: 1_000_000,
        max_dir_size: 5_000_000,
        user_id: owner.to_string(),
        allow_dir: true,
        allowed_file_types: vec![],
        allowed_file_names: vec![],
        sherry_permission: writers
            .iter()
            .map(|user| RemotePermission {
                sherry_permission_id: format!("p-{user}"),
                role: "WRITE".to_string(),
                sherry_id: folder_id.to_string(),
                user_id: user.to_string(),
            })
            .collect(),
    }
}
