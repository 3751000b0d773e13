//! Configuration types shared across server crates.
//!
//! All configuration is environment-driven. Each section provides a
//! `from_env` constructor; sections carrying secrets refuse to start with a
//! missing or placeholder value in production.

mod auth;
mod database;
mod environment;
mod server;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::ServerConfig;

use std::fmt;

/// Error raised when configuration is missing or malformed at startup.
///
/// This is always fatal: a process with a half-formed configuration must
/// not begin serving requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The offending variable or section
    pub key: String,
    /// What was wrong with it
    pub reason: String,
}

impl ConfigError {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a required variable that is absent.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::new(key, "not set")
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error: {}: {}", self.key, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Complete application configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables.
    ///
    /// In production every secret-bearing variable must be present and
    /// non-placeholder; in development sensible defaults are substituted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(environment)?,
            auth: AuthConfig::from_env(environment)?,
        })
    }
}
