//! User administration routes.
//!
//! Role checks happen here at the edge; the self-action and admin-target
//! guards are re-validated inside the admin service.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use ec_core::domain::value_objects::UserProfile;
use ec_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::users::{ChangeRoleRequest, SuspendRequest};
use crate::handlers::ApiError;
use crate::middleware::{require_admin, require_moderator, AuthContext};

/// PUT /users/{id}/role — admin only.
pub async fn change_role(
    ctx: AuthContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&ctx)?;

    let user = state
        .admin
        .change_role(ctx.id, path.into_inner(), request.role)
        .await?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// POST /users/{id}/suspend — admin or moderator.
pub async fn suspend(
    ctx: AuthContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<SuspendRequest>,
) -> Result<HttpResponse, ApiError> {
    require_moderator(&ctx)?;

    let user = state
        .admin
        .suspend(ctx.id, path.into_inner(), request.reason.clone())
        .await?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// POST /users/{id}/unsuspend — admin or moderator.
pub async fn unsuspend(
    ctx: AuthContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_moderator(&ctx)?;

    let user = state.admin.unsuspend(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// DELETE /users/{id} — admin only.
pub async fn delete(
    ctx: AuthContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&ctx)?;

    state.admin.delete(ctx.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}
