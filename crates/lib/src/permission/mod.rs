//! Grant/revoke workflow for shared-folder access.
//!
//! Permissions are authoritative on the remote side. The workflow resolves
//! the acting and target accounts, locates the source, and issues the change
//! through the API collaborator. It never mutates local state, so the cached
//! role on a [`Source`](crate::source::Source) stays stale until the folder
//! is next refreshed. That is documented behavior, not a bug.

use tracing::info;

use crate::api::types::{PermissionAction, PermissionPayload, RemoteUser};
use crate::api::{Api, ApiError};
use crate::auth::AuthError;
use crate::registry::RegistryStore;
use crate::source::{Access, SourceError};
use crate::validate;
use crate::Result;

pub mod errors;

pub use errors::PermissionError;


pub struct PermissionWorkflow<'a, A: Api> {
    api: &'a A,
}

impl<'a, A: Api> PermissionWorkflow<'a, A> {
    pub fn new(api: &'a A) -> Self {
        PermissionWorkflow { api }
    }

    /// Grant `role` on the source named `source_name` to `target`.
    pub async fn grant(
        &self,
        registry: &RegistryStore,
        acting: &str,
        target: &str,
        source_name: &str,
        role: Access,
    ) -> Result<()> {
        if role == Access::Owner {
            return Err(PermissionError::InvalidRole.into());
        }
        self.change(registry, acting, target, source_name, role, PermissionAction::Grant)
            .await
    }

    /// Revoke `target`'s access to the source named `source_name`.
    pub async fn revoke(
        &self,
        registry: &RegistryStore,
        acting: &str,
        target: &str,
        source_name: &str,
    ) -> Result<()> {
        // The service ignores the role on REFUSE but the payload shape still
        // requires one.
        self.change(
            registry,
            acting,
            target,
            source_name,
            Access::Read,
            PermissionAction::Refuse,
        )
        .await
    }

    async fn change(
        &self,
        registry: &RegistryStore,
        acting: &str,
        target: &str,
        source_name: &str,
        role: Access,
        action: PermissionAction,
    ) -> Result<()> {
        let credential = registry.credentials().resolve(acting, true)?;
        if credential.expired {
            return Err(AuthError::SessionExpired {
                username: credential.username.clone(),
            }
            .into());
        }

        // A target naming the acting account is rejected before any remote
        // call; the post-resolution check below catches the rest.
        if target == credential.username || target == credential.user_id {
            return Err(PermissionError::SelfTarget.into());
        }

        let target_user = self.resolve_target(target, &credential.access_token).await?;
        if target_user.user_id == credential.user_id {
            return Err(PermissionError::SelfTarget.into());
        }

        let source = registry
            .sources()
            .find(&credential.user_id, source_name)
            .ok_or_else(|| SourceError::NotFound {
                name: source_name.to_string(),
            })?;

        let payload = PermissionPayload { role, action };
        self.api
            .set_permission(&source.id, &target_user.user_id, &payload, &credential.access_token)
            .await?;

        info!(
            folder = %source.name,
            target = %target_user.username,
            ?action,
            "permission updated"
        );
        Ok(())
    }

    async fn resolve_target(&self, target: &str, token: &str) -> Result<RemoteUser> {
        let looked_up = if validate::is_id(target) {
            self.api.get_user(target, token).await
        } else {
            self.api.find_user(target, token).await
        };
        match looked_up {
            Ok(user) => Ok(user),
            Err(ApiError::Remote { status: 404, .. }) => Err(PermissionError::TargetNotFound {
                name: target.to_string(),
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }
}
