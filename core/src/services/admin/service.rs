//! User administration service implementation

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{User, UserRole};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::{RefreshTokenRepository, UserRepository};

/// Administrative operations on user accounts.
///
/// Role checks happen at the route layer; the self-action and admin-target
/// guards are business rules and are re-validated here for every call,
/// matched structurally rather than by message text.
///
/// Role changes, suspensions and deletions revoke the target's refresh
/// tokens so the change takes effect at the next re-authentication;
/// lifting a suspension does not.
pub struct UserAdminService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    users: Arc<U>,
    tokens: Arc<T>,
}

impl<U, T> UserAdminService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    /// Create a new user administration service.
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }

    /// Change a user's role. Admins cannot change their own role.
    pub async fn change_role(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        new_role: UserRole,
    ) -> DomainResult<User> {
        if actor_id == target_id {
            return Err(AuthError::CannotActOnSelf.into());
        }

        let mut target = self.load(target_id).await?;
        target.set_role(new_role);
        let target = self.users.update(target).await?;

        let revoked = self.tokens.revoke_all_for_user(target_id).await?;
        info!(target_id = %target_id, role = %new_role, revoked, "role changed");
        Ok(target)
    }

    /// Suspend a user. Self-suspension and suspending an administrator are
    /// both forbidden.
    pub async fn suspend(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        reason: Option<String>,
    ) -> DomainResult<User> {
        if actor_id == target_id {
            return Err(AuthError::CannotActOnSelf.into());
        }

        let mut target = self.load(target_id).await?;
        if target.role == UserRole::Admin {
            return Err(AuthError::CannotActOnAdmin.into());
        }

        target.suspend(reason);
        let target = self.users.update(target).await?;

        let revoked = self.tokens.revoke_all_for_user(target_id).await?;
        info!(target_id = %target_id, revoked, "user suspended");
        Ok(target)
    }

    /// Lift a suspension. Existing sessions are not restored; the user
    /// must log in again.
    pub async fn unsuspend(&self, target_id: Uuid) -> DomainResult<User> {
        let mut target = self.load(target_id).await?;
        target.unsuspend();
        let target = self.users.update(target).await?;

        info!(target_id = %target_id, "suspension lifted");
        Ok(target)
    }

    /// Delete a user. Self-deletion and deleting an administrator are both
    /// forbidden.
    pub async fn delete(&self, actor_id: Uuid, target_id: Uuid) -> DomainResult<()> {
        if actor_id == target_id {
            return Err(AuthError::CannotActOnSelf.into());
        }

        let target = self.load(target_id).await?;
        if target.role == UserRole::Admin {
            return Err(AuthError::CannotActOnAdmin.into());
        }

        // Dead tokens first: a half-completed delete must not leave live
        // credentials behind.
        self.tokens.revoke_all_for_user(target_id).await?;
        if !self.users.delete(target_id).await? {
            return Err(AuthError::UserNotFound.into());
        }

        info!(target_id = %target_id, "user deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }
}
