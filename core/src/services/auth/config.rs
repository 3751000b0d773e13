//! Authentication service configuration.

use ec_shared::config::{AuthConfig, Environment};

/// Configuration for [`super::AuthService`].
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Verification code lifetime in minutes
    pub code_ttl_minutes: i64,

    /// Maximum codes per phone within the rolling window
    pub max_codes_per_window: u32,

    /// Rolling window for the send-code limit, in seconds
    pub code_window_secs: u64,

    /// Development mode: send-code rate limits are bypassed
    pub development_mode: bool,

    /// Password length bounds enforced at set time
    pub password_min_len: usize,
    pub password_max_len: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 2,
            max_codes_per_window: 10,
            code_window_secs: 3600,
            development_mode: false,
            password_min_len: 6,
            password_max_len: 255,
        }
    }
}

impl AuthServiceConfig {
    /// Derive from the shared configuration.
    pub fn from_config(auth: &AuthConfig, environment: Environment) -> Self {
        Self {
            code_ttl_minutes: auth.sms_code_ttl_minutes,
            max_codes_per_window: auth.sms_codes_per_hour,
            development_mode: environment.is_development(),
            ..Default::default()
        }
    }
}
