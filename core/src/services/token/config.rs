//! Token issuer configuration.

use chrono::Duration;
use ec_shared::config::JwtConfig;

use crate::errors::DomainError;

/// Validated configuration for [`super::TokenIssuer`].
///
/// Construction is the fatal-at-startup boundary: an empty secret, shared
/// secrets or a non-positive lifetime is rejected here, never per-call.
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// Secret for signing access tokens
    pub access_secret: String,

    /// Secret for signing refresh tokens; must differ from the access
    /// secret so a leaked access secret cannot forge refresh tokens
    pub refresh_secret: String,

    /// Access token lifetime
    pub access_ttl: Duration,

    /// Refresh token lifetime
    pub refresh_ttl: Duration,

    /// Issuer claim value
    pub issuer: String,
}

impl TokenIssuerConfig {
    /// Build and validate from the shared JWT configuration.
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, DomainError> {
        if jwt.access_secret.trim().is_empty() || jwt.refresh_secret.trim().is_empty() {
            return Err(DomainError::internal("token signing secret is empty"));
        }
        if jwt.access_secret == jwt.refresh_secret {
            return Err(DomainError::internal(
                "access and refresh token secrets must differ",
            ));
        }
        if jwt.access_ttl_minutes <= 0 || jwt.refresh_ttl_days <= 0 {
            return Err(DomainError::internal("token lifetime must be positive"));
        }

        Ok(Self {
            access_secret: jwt.access_secret.clone(),
            refresh_secret: jwt.refresh_secret.clone(),
            access_ttl: Duration::minutes(jwt.access_ttl_minutes),
            refresh_ttl: Duration::days(jwt.refresh_ttl_days),
            issuer: jwt.issuer.clone(),
        })
    }
}
