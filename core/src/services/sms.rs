//! SMS dispatch collaborator interface.

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of an SMS provider.
///
/// Raw provider codes and payloads are mapped into these variants at the
/// infrastructure boundary and logged server-side; they never reach
/// clients verbatim.
#[derive(Error, Debug)]
pub enum SmsDispatchError {
    #[error("message rejected by provider: {reason}")]
    Rejected { reason: String },

    #[error("provider throttled the request")]
    Throttled,

    #[error("provider unavailable: {detail}")]
    Unavailable { detail: String },
}

/// Sends verification codes over SMS.
#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    /// Dispatch a verification code to a phone number.
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), SmsDispatchError>;
}
