//! Log-only SMS dispatcher for local development.

use async_trait::async_trait;
use tracing::info;

use ec_core::services::auth::mask_phone;
use ec_core::services::sms::{SmsDispatchError, SmsDispatcher};

/// Writes the code to the server log instead of sending it.
///
/// Development convenience only; wired up when no gateway is configured
/// outside production.
pub struct LogOnlySmsDispatcher;

#[async_trait]
impl SmsDispatcher for LogOnlySmsDispatcher {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), SmsDispatchError> {
        info!(phone = %mask_phone(phone), code, "log-only SMS dispatch");
        Ok(())
    }
}
