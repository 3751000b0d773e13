//! Authentication request DTOs.
//!
//! Validation here covers shape only (lengths, presence); the domain
//! layer re-validates semantics like the mobile prefix rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Domestic mobile number, 11 digits
    #[validate(length(equal = 11))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginWithCodeRequest {
    #[validate(length(equal = 11))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,

    /// Invalidate all other active sessions on success
    #[serde(default)]
    pub single_device: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginWithPasswordRequest {
    #[validate(length(equal = 11))]
    pub phone: String,

    #[validate(length(min = 1, max = 255))]
    pub password: String,

    /// Invalidate all other active sessions on success
    #[serde(default)]
    pub single_device: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(equal = 11))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,

    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}
