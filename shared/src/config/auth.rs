//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};
use std::env;

use super::{ConfigError, Environment};

const DEV_ACCESS_SECRET: &str = "dev-access-secret-do-not-use-in-production";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-do-not-use-in-production";

/// JWT signing configuration.
///
/// Access and refresh tokens are signed with *different* secrets so that a
/// leaked access-token secret cannot be used to forge refresh tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,

    /// Secret for signing refresh tokens
    pub refresh_secret: String,

    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from(DEV_ACCESS_SECRET),
            refresh_secret: String::from(DEV_REFRESH_SECRET),
            access_ttl_minutes: 15,
            refresh_ttl_days: 30,
            issuer: String::from("echochat"),
        }
    }
}

impl JwtConfig {
    /// Load from environment variables.
    ///
    /// Missing secrets are fatal in production; development falls back to
    /// fixed placeholder secrets.
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let access_secret = require_secret("ACCESS_TOKEN_SECRET", DEV_ACCESS_SECRET, environment)?;
        let refresh_secret =
            require_secret("REFRESH_TOKEN_SECRET", DEV_REFRESH_SECRET, environment)?;

        if access_secret == refresh_secret {
            return Err(ConfigError::new(
                "REFRESH_TOKEN_SECRET",
                "must differ from ACCESS_TOKEN_SECRET",
            ));
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl_minutes: parse_var("ACCESS_TOKEN_TTL_MINUTES", 15)?,
            refresh_ttl_days: parse_var("REFRESH_TOKEN_TTL_DAYS", 30)?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "echochat".to_string()),
        })
    }
}

/// Authentication service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Verification code lifetime in minutes
    pub sms_code_ttl_minutes: i64,

    /// Maximum verification codes per phone per hour
    pub sms_codes_per_hour: u32,

    /// Development-only credential bypass. Ignored outside debug builds
    /// and outside the development environment.
    pub auth_bypass: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            sms_code_ttl_minutes: 2,
            sms_codes_per_hour: 10,
            auth_bypass: false,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let auth_bypass = env::var("AUTH_BYPASS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if auth_bypass && environment.is_production() {
            return Err(ConfigError::new(
                "AUTH_BYPASS",
                "must not be enabled in production",
            ));
        }

        Ok(Self {
            jwt: JwtConfig::from_env(environment)?,
            sms_code_ttl_minutes: parse_var("SMS_CODE_TTL_MINUTES", 2)?,
            sms_codes_per_hour: parse_var("SMS_CODES_PER_HOUR", 10)?,
            auth_bypass,
        })
    }
}

fn require_secret(
    key: &str,
    dev_default: &str,
    environment: Environment,
) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ if environment.is_production() => Err(ConfigError::missing(key)),
        _ => Ok(dev_default.to_string()),
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::new(key, format!("invalid value: {}", raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttls_match_token_policy() {
        let config = JwtConfig::default();
        assert_eq!(config.access_ttl_minutes, 15);
        assert_eq!(config.refresh_ttl_days, 30);
        assert_ne!(config.access_secret, config.refresh_secret);
    }

    #[test]
    fn default_code_window_is_short() {
        let config = AuthConfig::default();
        assert_eq!(config.sms_code_ttl_minutes, 2);
        assert_eq!(config.sms_codes_per_hour, 10);
        assert!(!config.auth_bypass);
    }
}
