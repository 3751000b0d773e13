//! Business services and collaborator interfaces.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod cleanup;
pub mod password;
pub mod rate_limit;
pub mod sms;
pub mod token;

pub use admin::UserAdminService;
pub use auth::{AuthService, AuthServiceConfig};
pub use chat::{ChatCompletionClient, ChatDispatchError, ChatMessage, ChatService};
pub use cleanup::{CleanupConfig, CleanupTask};
pub use password::PasswordHasher;
pub use rate_limit::{RateDecision, RateLimiter, RateQuota};
pub use sms::{SmsDispatchError, SmsDispatcher};
pub use token::{TokenIssuer, TokenIssuerConfig};
