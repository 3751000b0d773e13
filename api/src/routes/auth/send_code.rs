//! POST /auth/send-code

use actix_web::{web, HttpResponse};

use ec_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::auth::SendCodeRequest;
use crate::handlers::ApiError;
use crate::routes::validated;

/// Send a verification code to a phone number.
pub async fn send_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = validated(request)?;

    state.auth.send_verification_code(&request.phone).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Verification code sent")))
}
