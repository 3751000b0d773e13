//! POST /auth/set-password

use actix_web::{web, HttpResponse};

use ec_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::auth::SetPasswordRequest;
use crate::handlers::ApiError;
use crate::routes::validated;

/// Set a password after proving phone ownership with a verification code.
pub async fn set_password(
    state: web::Data<AppState>,
    request: web::Json<SetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = validated(request)?;

    state
        .auth
        .set_password(&request.phone, &request.code, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated")))
}
