//! Role guards layered on the session gate output.
//!
//! Pure functions: the gate has already authenticated and suspension-
//! checked the caller, these only decide whether the role is sufficient.
//! The rejection message enumerates the acceptable roles — that list is
//! not secret and saves a round trip of client debugging.

use ec_core::domain::entities::UserRole;
use ec_core::errors::AuthError;

use super::auth::AuthContext;
use crate::handlers::ApiError;

/// Require the caller's role to be one of `allowed`.
pub fn require_role(ctx: &AuthContext, allowed: &[UserRole]) -> Result<(), ApiError> {
    if allowed.contains(&ctx.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            required: allowed.iter().map(|role| role.to_string()).collect(),
        }
        .into())
    }
}

/// Require the Admin role.
pub fn require_admin(ctx: &AuthContext) -> Result<(), ApiError> {
    require_role(ctx, &[UserRole::Admin])
}

/// Require the Admin or Moderator role.
pub fn require_moderator(ctx: &AuthContext) -> Result<(), ApiError> {
    require_role(ctx, &[UserRole::Admin, UserRole::Moderator])
}
