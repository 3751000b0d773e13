//! POST /auth/login-with-code and /auth/login-with-password

use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::{LoginWithCodeRequest, LoginWithPasswordRequest};
use crate::handlers::ApiError;
use crate::routes::validated;

/// OTP login. Unknown phones with a valid code are auto-registered.
pub async fn login_with_code(
    state: web::Data<AppState>,
    request: web::Json<LoginWithCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = validated(request)?;

    let response = state
        .auth
        .login_with_code(&request.phone, &request.code, request.single_device)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Password login for accounts that have set one.
pub async fn login_with_password(
    state: web::Data<AppState>,
    request: web::Json<LoginWithPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = validated(request)?;

    let response = state
        .auth
        .login_with_password(&request.phone, &request.password, request.single_device)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
