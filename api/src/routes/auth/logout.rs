//! POST /auth/logout

use actix_web::{web, HttpResponse};

use ec_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::auth::LogoutRequest;
use crate::handlers::ApiError;

/// Revoke a refresh token. Succeeds even when the token is unknown or
/// already revoked; only a malformed body fails.
pub async fn logout(
    state: web::Data<AppState>,
    request: web::Json<LogoutRequest>,
) -> Result<HttpResponse, ApiError> {
    state.auth.logout(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out")))
}
