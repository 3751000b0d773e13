//! Domain-specific error types for authentication and related operations.
//!
//! Several variants deliberately collapse distinct failure causes into one
//! message: `InvalidOrExpiredCode` hides whether a code was absent, used or
//! expired, and `InvalidCredentials` hides whether the phone or the
//! password was wrong. Both prevent enumeration through error text.

use ec_shared::types::ErrorResponse;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid phone number format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("Too many requests, please retry in {retry_after_secs} seconds")]
    RateLimitExceeded { retry_after_secs: u64 },

    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    #[error("Invalid phone number or password")]
    InvalidCredentials,

    #[error("No password set for this account, please login with a verification code")]
    PasswordNotSet,

    #[error("User not found")]
    UserNotFound,

    #[error("Account suspended, please contact support")]
    Suspended,

    #[error("Access requires one of the following roles: {}", .required.join(", "))]
    Forbidden { required: Vec<String> },

    #[error("This action cannot be applied to your own account")]
    CannotActOnSelf,

    #[error("This action cannot be applied to an administrator account")]
    CannotActOnAdmin,

    #[error("Failed to send verification code, please try again later")]
    SmsDispatchFailure,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    InvalidOrExpired,

    #[error("Token has been revoked or does not exist")]
    RevokedOrNotFound,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid format for field: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length for field: {field} (expected {min} to {max})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
    },
}

impl AuthError {
    /// Stable error code for programmatic client handling.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidPhoneFormat { .. } => "INVALID_PHONE_FORMAT",
            AuthError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            AuthError::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::PasswordNotSet => "PASSWORD_NOT_SET",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Suspended => "ACCOUNT_SUSPENDED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
            AuthError::CannotActOnSelf => "CANNOT_ACT_ON_SELF",
            AuthError::CannotActOnAdmin => "CANNOT_ACT_ON_ADMIN",
            AuthError::SmsDispatchFailure => "SMS_DISPATCH_FAILURE",
        }
    }
}

impl TokenError {
    /// Stable error code for programmatic client handling.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidOrExpired => "INVALID_OR_EXPIRED_TOKEN",
            TokenError::RevokedOrNotFound => "TOKEN_REVOKED_OR_NOT_FOUND",
            TokenError::GenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

impl ValidationError {
    /// Stable error code for programmatic client handling.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::InvalidLength { .. } => "INVALID_LENGTH",
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let response = ErrorResponse::new(err.code(), err.to_string());
        match err {
            AuthError::RateLimitExceeded { retry_after_secs } => {
                response.with_retry_after(*retry_after_secs)
            }
            _ => response,
        }
    }
}

impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}

impl From<&ValidationError> for ErrorResponse {
    fn from(err: &ValidationError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_message_lists_required_roles() {
        let err = AuthError::Forbidden {
            required: vec!["ADMIN".to_string(), "MODERATOR".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("ADMIN"));
        assert!(message.contains("MODERATOR"));
    }

    #[test]
    fn rate_limit_response_carries_retry_after() {
        let err = AuthError::RateLimitExceeded {
            retry_after_secs: 300,
        };
        let response: ErrorResponse = (&err).into();
        assert_eq!(response.error, "RATE_LIMIT_EXCEEDED");
        assert_eq!(response.retry_after_secs, Some(300));
    }

    #[test]
    fn code_failure_modes_share_one_message() {
        // absent, used and expired must be indistinguishable to the caller
        let err = AuthError::InvalidOrExpiredCode;
        assert_eq!(err.to_string(), "Invalid or expired verification code");
    }

    #[test]
    fn token_error_codes_are_distinct() {
        assert_ne!(
            TokenError::InvalidOrExpired.code(),
            TokenError::RevokedOrNotFound.code()
        );
    }
}
