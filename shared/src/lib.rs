//! Shared utilities and common types for the EchoChat server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response structures
//! - Common type definitions

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, ServerConfig,
};
pub use types::{ApiResponse, ErrorResponse, MessageResponse};
