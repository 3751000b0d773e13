//! # EchoChat Infrastructure
//!
//! Concrete implementations of the core repository and collaborator
//! traits: MySQL persistence, the fixed-window rate limiter, the SMS
//! gateway client, the bcrypt password hasher and the chat completion
//! client.

pub mod chat;
pub mod database;
pub mod password;
pub mod rate_limit;
pub mod sms;

use thiserror::Error;

/// Infrastructure-level errors raised while constructing clients.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("http client error: {0}")]
    Http(String),
}
