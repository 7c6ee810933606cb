//! Wire types of the sherry HTTP API.

use serde::{Deserialize, Serialize};

use crate::source::Access;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// Folder description sent on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPayload {
    pub name: String,
    pub allow_dir: bool,
    pub max_file_size: u64,
    pub max_dir_size: u64,
    pub allowed_file_names: Vec<String>,
    pub allowed_file_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFileName {
    pub file_name_id: String,
    pub name: String,
    pub sherry_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFileType {
    pub file_type_id: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub sherry_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePermission {
    pub sherry_permission_id: String,
    pub role: String,
    pub sherry_id: String,
    pub user_id: String,
}

/// Folder description as returned by the service, including the permission
/// list the local role is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFolder {
    pub sherry_id: String,
    pub name: String,
    pub max_file_size: u64,
    pub max_dir_size: u64,
    /// Owner of the folder.
    pub user_id: String,
    pub allow_dir: bool,
    #[serde(default)]
    pub allowed_file_types: Vec<RemoteFileType>,
    #[serde(default)]
    pub allowed_file_names: Vec<RemoteFileName>,
    #[serde(default)]
    pub sherry_permission: Vec<RemotePermission>,
}

/// Permission mutation verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionAction {
    #[serde(rename = "GRANT")]
    Grant,
    #[serde(rename = "REFUSE")]
    Refuse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionPayload {
    pub role: Access,
    pub action: PermissionAction,
}
