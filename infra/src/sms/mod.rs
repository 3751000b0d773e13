//! SMS dispatch implementations.

mod gateway;
mod log_only;

pub use gateway::{SmsGateway, SmsGatewayConfig};
pub use log_only::LogOnlySmsDispatcher;

use async_trait::async_trait;
use ec_core::services::sms::{SmsDispatchError, SmsDispatcher};
use ec_shared::config::Environment;
use tracing::warn;

use crate::InfrastructureError;

/// Runtime-selected SMS backend.
pub enum SmsBackend {
    Gateway(SmsGateway),
    LogOnly(LogOnlySmsDispatcher),
}

impl SmsBackend {
    /// Select a backend from the environment.
    ///
    /// Production requires a configured gateway; elsewhere a missing
    /// gateway falls back to log-only dispatch.
    pub fn from_env(environment: Environment) -> Result<Self, InfrastructureError> {
        match SmsGateway::from_env() {
            Ok(gateway) => Ok(SmsBackend::Gateway(gateway)),
            Err(e) if environment.is_production() => Err(e),
            Err(_) => {
                warn!("SMS gateway not configured, codes will be written to the log");
                Ok(SmsBackend::LogOnly(LogOnlySmsDispatcher))
            }
        }
    }
}

#[async_trait]
impl SmsDispatcher for SmsBackend {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), SmsDispatchError> {
        match self {
            SmsBackend::Gateway(gateway) => gateway.send_code(phone, code).await,
            SmsBackend::LogOnly(log_only) => log_only.send_code(phone, code).await,
        }
    }
}
