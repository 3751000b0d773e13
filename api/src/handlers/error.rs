//! Mapping from domain errors to HTTP responses.

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use ec_core::errors::{AuthError, DomainError, TokenError};
use ec_shared::types::ErrorResponse;

/// Wrapper carrying a domain error across the actix boundary.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError(DomainError::Auth(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Auth(auth) => match auth {
                AuthError::InvalidPhoneFormat { .. }
                | AuthError::InvalidOrExpiredCode
                | AuthError::InvalidCredentials
                | AuthError::PasswordNotSet => StatusCode::BAD_REQUEST,
                AuthError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Suspended
                | AuthError::Forbidden { .. }
                | AuthError::CannotActOnSelf
                | AuthError::CannotActOnAdmin => StatusCode::FORBIDDEN,
                AuthError::SmsDispatchFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            DomainError::Token(token) => match token {
                TokenError::InvalidOrExpired | TokenError::RevokedOrNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                TokenError::GenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            },
            DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
            DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match &self.0 {
            DomainError::Auth(auth) => ErrorResponse::from(auth),
            DomainError::Token(token) => ErrorResponse::from(token),
            DomainError::ValidationErr(validation) => ErrorResponse::from(validation),
            DomainError::Internal { message } => {
                // The detail goes to the log; clients get the generic
                // message outside debug builds.
                error!(detail = %message, "internal error");
                if cfg!(debug_assertions) {
                    ErrorResponse::new("INTERNAL_ERROR", message.clone())
                } else {
                    ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
                }
            }
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(retry_after) = body.retry_after_secs {
            builder.insert_header((header::RETRY_AFTER, retry_after.to_string()));
        }
        builder.json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::errors::ValidationError;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                AuthError::InvalidOrExpiredCode.into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::RateLimitExceeded {
                    retry_after_secs: 60,
                }
                .into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (AuthError::Suspended.into(), StatusCode::FORBIDDEN),
            (AuthError::UserNotFound.into(), StatusCode::NOT_FOUND),
            (
                DomainError::Token(TokenError::RevokedOrNotFound).into(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::ValidationErr(ValidationError::InvalidFormat {
                    field: "code".to_string(),
                })
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::internal("boom").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "for {}", err);
        }
    }

    #[test]
    fn rate_limit_response_sets_retry_after_header() {
        let err: ApiError = AuthError::RateLimitExceeded {
            retry_after_secs: 120,
        }
        .into();
        let response = err.error_response();
        assert_eq!(
            response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
            Some("120")
        );
    }
}
