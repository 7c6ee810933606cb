//! Remote service collaborator.
//!
//! The registry core consumes the sherry service through the [`Api`] trait;
//! [`HttpApi`] is the JSON-over-HTTPS implementation. Commands never parse
//! responses themselves, they receive the typed values from here.

use async_trait::async_trait;

pub mod errors;
pub mod http;
pub mod types;

pub use errors::ApiError;
pub use http::HttpApi;

use types::{
    FolderPayload, LoginPayload, LoginResponse, PermissionPayload, RegisterPayload, RemoteFolder,
    RemoteUser,
};

/// Request/response contract of the sherry service.
///
/// Successful responses are HTTP 200/201/204; anything else surfaces as
/// [`ApiError::Remote`] with the service's error envelope.
#[async_trait]
pub trait Api: Send + Sync {
    async fn register(&self, payload: &RegisterPayload) -> Result<RemoteUser, ApiError>;

    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, ApiError>;

    /// Look a user up by exact username.
    async fn find_user(&self, username: &str, token: &str) -> Result<RemoteUser, ApiError>;

    /// Look a user up by id.
    async fn get_user(&self, user_id: &str, token: &str) -> Result<RemoteUser, ApiError>;

    async fn folder_create(
        &self,
        payload: &FolderPayload,
        token: &str,
    ) -> Result<RemoteFolder, ApiError>;

    async fn folder_update(
        &self,
        folder_id: &str,
        payload: &FolderPayload,
        token: &str,
    ) -> Result<RemoteFolder, ApiError>;

    /// Fetch a folder by id or `owner:folder` reference.
    async fn folder_get(&self, reference: &str, token: &str) -> Result<RemoteFolder, ApiError>;

    /// Folders owned by the authenticated account.
    async fn my_folders(&self, token: &str) -> Result<Vec<RemoteFolder>, ApiError>;

    /// Folders shared with the authenticated account.
    async fn available_folders(&self, token: &str) -> Result<Vec<RemoteFolder>, ApiError>;

    async fn set_permission(
        &self,
        folder_id: &str,
        user_id: &str,
        payload: &PermissionPayload,
        token: &str,
    ) -> Result<(), ApiError>;
}
