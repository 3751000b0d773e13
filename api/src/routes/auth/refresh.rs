//! POST /auth/refresh

use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::RefreshRequest;
use crate::handlers::ApiError;

/// Exchange a refresh token for a new access token.
pub async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state
        .auth
        .refresh_access_token(&request.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(session))
}
